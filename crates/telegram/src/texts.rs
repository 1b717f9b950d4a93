//! User-facing reply texts. The bot speaks Russian.

/// Greeting for `/start`.
pub const WELCOME: &str = "\
Здравствуйте! Я VoiceScribe — помогаю обрабатывать голосовые сообщения.

Отправьте аудиофайл или голосовое сообщение, и я сделаю:
• Полную текстовую расшифровку
• Краткие тезисы (3–7 пунктов)

Готов к работе.";

/// Usage summary for `/help`.
pub const HELP: &str = "\
Я делаю две вещи:
1. Расшифровываю аудио в текст
2. Выделяю ключевые тезисы

Поддерживаемые форматы: голосовые сообщения, .ogg, .mp3, .wav

Просто отправьте аудио — покажу на практике.";

/// Rejection for anything that is not a processable audio attachment.
pub const UNSUPPORTED: &str = "Я работаю только с аудиофайлами форматов .mp3, .ogg и .wav. \
Пожалуйста, отправьте голосовое сообщение или аудиозапись.";

/// Status reply sent as soon as an audio attachment is accepted.
pub const PROCESSING: &str = "Файл получен. Обрабатываю...";

/// Terminal reply when transcription yields no usable text.
pub const NO_SPEECH: &str =
    "Не удалось распознать речь. Возможно, запись слишком тихая или содержит только шум.";

/// Terminal reply for any pipeline failure without a more specific cause.
pub const PIPELINE_FAILED: &str = "Произошла ошибка при обработке аудио. Попробуйте ещё раз.";

/// Terminal reply when the transcription service rejected the audio itself.
pub const LOW_AUDIO_QUALITY: &str = "Качество записи низкое, не удалось обработать. \
Попробуйте записать сообщение в более тихом месте.";

/// Final reply carrying the full transcript and the thesis list.
#[must_use]
pub fn compose_result(transcript: &str, theses: &str) -> String {
    format!("📝 Транскрипция:\n{transcript}\n\n📌 Тезисы:\n{theses}\n\nНужно что-то ещё?")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_layout_keeps_sections_in_order() {
        let text = compose_result("привет, это тест", "1. Приветствие.");
        assert_eq!(
            text,
            "📝 Транскрипция:\nпривет, это тест\n\n📌 Тезисы:\n1. Приветствие.\n\nНужно что-то ещё?"
        );
    }
}

use serde::{Deserialize, Serialize};

/// Модель запроса на синтез речи
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// Путь к референсному аудио (образец голоса)
    pub ref_audio_path: String,

    /// Транскрипция образца. Пустая строка — транскрибировать автоматически
    #[serde(default)]
    pub ref_text: String,

    /// Текст на вьетнамском для синтеза
    pub gen_text: String,

    /// Скорость речи (0.3 - 2.0), по умолчанию 1.0
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_speed() -> f32 {
    1.0
}

/// Результат синтеза речи
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// Путь к сгенерированному wav файлу
    pub audio_path: String,

    /// Частота дискретизации
    pub sample_rate: u32,

    /// Длительность аудио в секундах
    pub duration: f64,

    /// Путь к изображению спектрограммы
    pub spectrogram_path: String,

    /// Timestamp when generation was completed
    pub timestamp: i64,
}

/// Результат выбора образца голоса из каталога
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleResolution {
    /// Путь к аудио файлу образца, если найден
    pub audio_path: Option<String>,

    /// Транскрипция образца (пустая строка, если файла с текстом нет)
    pub text: String,
}

/// Состояние движка синтеза, отображаемое в UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Готов ли движок принимать запросы
    pub ready: bool,

    /// Человекочитаемое описание текущего состояния
    pub message: String,
}

// Domain models module
// Contains core data structures used throughout the application

// Reexport all model types for easy access
pub mod synthesis;

// Экспортируем основные типы для удобства использования
pub use synthesis::{
    EngineStatus, SampleResolution, SynthesisRequest, SynthesisResult,
};

use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

pub fn init_logger() {
    // Set RUST_LOG explicitly for HTTP request tracing if not set
    if std::env::var("RUST_LOG").is_err() {
        // Use unsafe block for setting environment variables
        unsafe {
            std::env::set_var("RUST_LOG", "warn,vivoice=info,reqwest=debug");
        }
    }

    // Установка базового фильтра и переопределение через переменные окружения
    let env = Env::default().filter_or("RUST_LOG", "warn,vivoice=info,reqwest=debug");

    let mut builder = Builder::from_env(env);

    // Явно подавляем логи от определенных модулей
    builder
        .filter_module("wry", LevelFilter::Error)
        .filter_module("tracing", LevelFilter::Error)
        .filter_module("mio", LevelFilter::Error)
        .filter_module("hyper", LevelFilter::Error)
        .filter_module("tauri", LevelFilter::Warn)
        .filter_module("tao", LevelFilter::Error)
        // Включаем логирование HTTP-клиента
        .filter_module("reqwest", LevelFilter::Debug)
        .filter_module("hyper::client", LevelFilter::Debug)
        // Подробные логи для пайплайна синтеза
        .filter_module("vivoice::services::synthesis", LevelFilter::Debug)
        .filter_module("vivoice::services::tts", LevelFilter::Debug)
        // Форматирование логов
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr) // Вывод в stderr для совместимости с консолью Tauri
        .init();
}

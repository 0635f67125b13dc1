#![macro_use]

use simplelog::{ConfigBuilder, LevelFilter, SimpleLogger};

macro_rules! run {
    ($program: expr => $expected: expr) => {{
        let mut interp = lexenv::Interpreter::default();
        let value = interp.interpret(&$program)?;
        assert_eq!(value, $expected);
        Ok(())
    }};
}

macro_rules! run_err {
    ($program: expr) => {{
        let mut interp = lexenv::Interpreter::default();
        match interp.interpret(&$program) {
            Ok(value) => panic!("expected an error, got {}", value),
            Err(e) => e,
        }
    }};
}

pub type Result = std::result::Result<(), lexenv::Error>;

#[allow(dead_code)]
pub fn setup_logger() {
    let _ = SimpleLogger::init(
        LevelFilter::Debug,
        ConfigBuilder::new()
            .set_thread_level(LevelFilter::Off)
            .set_time_level(LevelFilter::Off)
            .set_location_level(LevelFilter::Debug)
            .build(),
    );
}

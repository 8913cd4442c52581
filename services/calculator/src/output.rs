use std::io::Write;

use expression::Evaluation;

use crate::config::{Config, OutputFormat};
use crate::error::ServiceError;

pub fn write<W: Write>(
    out: &mut W,
    config: &Config,
    result: &Evaluation,
) -> Result<(), ServiceError> {
    match config.format {
        // Cyan prefix line for terminals
        OutputFormat::Text => writeln!(
            out,
            "\x1b[96m{} {} {:?}\x1b[0m",
            config.prefix, result.int, result.float
        )?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, result)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(config: &Config, result: Evaluation) -> Result<String, Box<dyn std::error::Error>> {
        let mut buffer = Vec::new();
        write(&mut buffer, config, &result)?;
        Ok(String::from_utf8(buffer)?)
    }

    #[test]
    fn test_text() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::default();

        assert_eq!(
            render(&config, Evaluation { int: 5, float: 5.0 })?,
            "\x1b[96mValue: 5 5.0\x1b[0m\n"
        );
        assert_eq!(
            render(
                &config,
                Evaluation {
                    int: i64::MIN,
                    float: f64::NEG_INFINITY
                }
            )?,
            "\x1b[96mValue: -9223372036854775808 -inf\x1b[0m\n"
        );
        Ok(())
    }

    #[test]
    fn test_json() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config {
            format: OutputFormat::Json,
            ..Config::default()
        };

        assert_eq!(
            render(&config, Evaluation { int: -2, float: -2.0 })?,
            "{\"int\":-2,\"float\":-2.0}\n"
        );
        Ok(())
    }
}

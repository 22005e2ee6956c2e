//! Line-oriented prompts for collecting run settings.
//!
//! Every field is a small state machine: it starts [`FieldState::Unset`],
//! each line of input moves it to [`FieldState::Invalid`] or
//! [`FieldState::Valid`] through the field's validator, and only `Valid`
//! hands control to the next field.

use owo_colors::OwoColorize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{RunConfig, DEFAULT_COLOR_MAPPING};
use crate::utils::{
    parse_max_results, validate_color_mapping, validate_identity, validate_mask_path,
    validate_query, ValidationError, DEFAULT_MAX_RESULTS,
};

/// Errors raised while talking to the user
#[derive(Debug, thiserror::Error)]
pub enum UiError {
    #[error("input closed before the settings were complete")]
    InputClosed,

    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Progress of a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldState<T> {
    Unset,
    Invalid(ValidationError),
    Valid(T),
}

impl<T> FieldState<T> {
    /// Feed one line of input through `validator`.
    ///
    /// A `Valid` field ignores further input.
    pub fn advance(self, input: &str, validator: fn(&str) -> Result<T, ValidationError>) -> Self {
        match self {
            FieldState::Valid(value) => FieldState::Valid(value),
            FieldState::Unset | FieldState::Invalid(_) => match validator(input) {
                Ok(value) => FieldState::Valid(value),
                Err(err) => FieldState::Invalid(err),
            },
        }
    }
}

/// A prompt plus the validator that accepts its answer.
#[derive(Debug, Clone, Copy)]
pub struct Field<T> {
    pub prompt: &'static str,
    pub validator: fn(&str) -> Result<T, ValidationError>,
}

pub const IDENTITY_FIELD: Field<String> = Field {
    prompt: "Type a valid email address",
    validator: validate_identity,
};

pub const QUERY_FIELD: Field<String> = Field {
    prompt: "Type Pubmed Advanced query",
    validator: validate_query,
};

pub const BACKGROUND_FIELD: Field<Option<String>> = Field {
    prompt: "What color do you want for background (white, black, red..)?\n Press Enter for default (transparent)",
    validator: accept_background,
};

pub const COLOR_MAPPING_FIELD: Field<String> = Field {
    prompt: "What colormap do you want to use for the text?\n Press Enter for default (viridis)",
    validator: accept_color_mapping,
};

pub const MAX_RESULTS_FIELD: Field<usize> = Field {
    prompt: "Input max number of publications to consider.\n Press Enter for default (300)",
    validator: accept_max_results,
};

pub const MASK_FIELD: Field<Option<PathBuf>> = Field {
    prompt: "Type name of mask image including format.\n Press Enter for no mask file",
    validator: accept_mask,
};

fn accept_background(input: &str) -> Result<Option<String>, ValidationError> {
    Ok((!input.is_empty()).then(|| input.to_string()))
}

fn accept_color_mapping(input: &str) -> Result<String, ValidationError> {
    if input.is_empty() {
        return Ok(DEFAULT_COLOR_MAPPING.to_string());
    }
    validate_color_mapping(input).map(|map| map.name().to_string())
}

fn accept_max_results(input: &str) -> Result<usize, ValidationError> {
    if input.is_empty() {
        return Ok(DEFAULT_MAX_RESULTS);
    }
    parse_max_results(input)
}

fn accept_mask(input: &str) -> Result<Option<PathBuf>, ValidationError> {
    if input.is_empty() {
        return Ok(None);
    }
    validate_mask_path(input).map(Some)
}

/// Prompts over any line reader and writer.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the writer, mostly for inspecting output in tests.
    pub fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<String, UiError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(UiError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until the field is valid.
    pub fn ask<T>(&mut self, field: &Field<T>) -> Result<T, UiError> {
        let mut state = FieldState::Unset;
        loop {
            match state {
                FieldState::Valid(value) => return Ok(value),
                FieldState::Invalid(ref err) => {
                    writeln!(self.output, "{}", err.to_string().red())?;
                }
                FieldState::Unset => {}
            }
            writeln!(self.output, "{}", field.prompt)?;
            self.output.flush()?;

            let line = self.read_line()?;
            state = state.advance(&line, field.validator);
        }
    }

    /// Ask whether to reuse the settings file of a previous run.
    pub fn confirm_import(&mut self) -> Result<bool, UiError> {
        writeln!(
            self.output,
            "Do you want to import a previously generated json file? (y/n)"
        )?;
        self.output.flush()?;

        let answer = self.read_line()?.to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    /// Collect all six settings, repeating until the user confirms.
    pub fn collect_run_config(&mut self) -> Result<RunConfig, UiError> {
        loop {
            let config = RunConfig {
                identity: self.ask(&IDENTITY_FIELD)?,
                query: self.ask(&QUERY_FIELD)?,
                background_color: self.ask(&BACKGROUND_FIELD)?,
                color_mapping: self.ask(&COLOR_MAPPING_FIELD)?,
                max_results: self.ask(&MAX_RESULTS_FIELD)?,
                mask_file: self.ask(&MASK_FIELD)?,
            };

            writeln!(self.output)?;
            writeln!(self.output, "{}", "Input summary:".bold())?;
            for (key, value) in config.summary() {
                writeln!(self.output, "  {} : {}", key.cyan(), value)?;
            }
            writeln!(self.output, "Confirm? (yes)")?;
            self.output.flush()?;

            if self.read_line()?.eq_ignore_ascii_case("yes") {
                return Ok(config);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output_of(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn test_field_state_transitions() {
        let state: FieldState<String> = FieldState::Unset;
        let state = state.advance("nope", validate_identity);
        assert!(matches!(
            state,
            FieldState::Invalid(ValidationError::InvalidIdentityFormat(_))
        ));

        let state = state.advance("a.b@example.com", validate_identity);
        assert_eq!(state, FieldState::Valid("a.b@example.com".to_string()));

        // Terminal state ignores further input.
        let state = state.advance("garbage", validate_identity);
        assert_eq!(state, FieldState::Valid("a.b@example.com".to_string()));
    }

    #[test]
    fn test_ask_reprompts_on_invalid_identity() {
        let mut p = prompter("not-an-email\na.b@example.com\n");
        assert_eq!(p.ask(&IDENTITY_FIELD).unwrap(), "a.b@example.com");

        let out = output_of(p);
        assert_eq!(out.matches("Type a valid email address").count(), 2);
        assert!(out.contains("Email not valid"));
    }

    #[test]
    fn test_color_mapping_default_and_reprompt() {
        let mut p = prompter("\n");
        assert_eq!(p.ask(&COLOR_MAPPING_FIELD).unwrap(), "viridis");

        let mut p = prompter("rainbow\nPlasma\n");
        assert_eq!(p.ask(&COLOR_MAPPING_FIELD).unwrap(), "plasma");
        assert!(output_of(p).contains("Colormap does not exist"));
    }

    #[test]
    fn test_max_results_default_and_reprompt() {
        let mut p = prompter("\n");
        assert_eq!(p.ask(&MAX_RESULTS_FIELD).unwrap(), 300);

        let mut p = prompter("lots\n25\n");
        assert_eq!(p.ask(&MAX_RESULTS_FIELD).unwrap(), 25);
    }

    #[test]
    fn test_missing_mask_reprompts() {
        let dir = tempfile::tempdir().unwrap();
        let mask = dir.path().join("mask.png");
        std::fs::write(&mask, b"png").unwrap();

        let input = format!("{}\n{}\n", dir.path().join("absent.png").display(), mask.display());
        let mut p = prompter(&input);
        assert_eq!(p.ask(&MASK_FIELD).unwrap(), Some(mask));
        assert!(output_of(p).contains("Mask file not found"));
    }

    #[test]
    fn test_mask_can_be_skipped_after_error() {
        let mut p = prompter("/nonexistent/mask.png\n\n");
        assert_eq!(p.ask(&MASK_FIELD).unwrap(), None);
    }

    #[test]
    fn test_blank_query_reprompts() {
        let mut p = prompter("\n   \nmalaria\n");
        assert_eq!(p.ask(&QUERY_FIELD).unwrap(), "malaria");

        let out = output_of(p);
        assert_eq!(out.matches("Type Pubmed Advanced query").count(), 3);
        assert!(out.contains("Query must not be empty"));
    }

    #[test]
    fn test_input_closed() {
        let mut p = prompter("bad-email\n");
        assert!(matches!(p.ask(&IDENTITY_FIELD), Err(UiError::InputClosed)));
    }

    #[test]
    fn test_confirm_import() {
        assert!(prompter("y\n").confirm_import().unwrap());
        assert!(prompter("YES\n").confirm_import().unwrap());
        assert!(!prompter("n\n").confirm_import().unwrap());
        assert!(!prompter("\n").confirm_import().unwrap());
    }

    #[test]
    fn test_collect_run_config_with_retry_round() {
        let input = [
            // First round, rejected at confirmation.
            "a.b@example.com",
            "malaria",
            "",
            "",
            "",
            "",
            "no",
            // Second round.
            "c.d@example.org",
            "tuberculosis[MeSH]",
            "black",
            "inferno",
            "50",
            "",
            "yes",
        ]
        .join("\n")
            + "\n";

        let mut p = prompter(&input);
        let config = p.collect_run_config().unwrap();

        assert_eq!(
            config,
            RunConfig {
                identity: "c.d@example.org".to_string(),
                query: "tuberculosis[MeSH]".to_string(),
                background_color: Some("black".to_string()),
                color_mapping: "inferno".to_string(),
                max_results: 50,
                mask_file: None,
            }
        );
        assert_eq!(output_of(p).matches("Confirm? (yes)").count(), 2);
    }
}

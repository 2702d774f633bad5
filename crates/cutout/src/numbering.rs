use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

/// Hands out serial numbers for saved subjects.
///
/// One counter is threaded through every image of a batch so numbers stay
/// unique and gap-free for the whole run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialCounter {
    next: u32,
    issued: u32,
}

impl SerialCounter {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u32) -> Self {
        Self {
            next: first,
            issued: 0,
        }
    }

    /// Return the next serial and advance
    pub fn next_serial(&mut self) -> u32 {
        let serial = self.next;
        self.next += 1;
        self.issued += 1;
        serial
    }

    /// How many serials this counter has handed out
    pub fn issued(&self) -> u32 {
        self.issued
    }
}

impl Default for SerialCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Numbering source for a single extraction call
#[derive(Debug)]
pub enum Numbering<'c> {
    /// Draw from a counter shared with the caller (batch-wide numbering)
    Shared(&'c mut SerialCounter),
    /// Private counter starting at 1 for this image alone
    PerImage(SerialCounter),
}

impl<'c> Numbering<'c> {
    pub fn per_image() -> Self {
        Numbering::PerImage(SerialCounter::new())
    }

    pub fn next_serial(&mut self) -> u32 {
        match self {
            Numbering::Shared(counter) => counter.next_serial(),
            Numbering::PerImage(counter) => counter.next_serial(),
        }
    }
}

impl<'c> From<&'c mut SerialCounter> for Numbering<'c> {
    fn from(counter: &'c mut SerialCounter) -> Self {
        Numbering::Shared(counter)
    }
}

/// How a batch run numbers its output files
#[derive(
    Debug, Clone, Copy, Default,
    Serialize, Deserialize, JsonSchema,
    Display, EnumString, VariantNames,
    PartialEq, Eq
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "kebab-case")]
pub enum NumberingMode {
    /// One counter across every image of the run
    #[default]
    Batch,
    /// Restart at 1 for each image; later files overwrite earlier ones of the same number
    PerImage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn counter_starts_at_one_and_counts() {
        let mut counter = SerialCounter::new();
        assert_eq!(counter.next_serial(), 1);
        assert_eq!(counter.next_serial(), 2);
        assert_eq!(counter.issued(), 2);
        assert_eq!(counter.next_serial(), 3);
    }

    #[test]
    fn shared_numbering_advances_callers_counter() {
        let mut counter = SerialCounter::new();
        {
            let mut numbering = Numbering::from(&mut counter);
            assert_eq!(numbering.next_serial(), 1);
            assert_eq!(numbering.next_serial(), 2);
        }
        assert_eq!(counter.next_serial(), 3);
    }

    #[test]
    fn per_image_numbering_restarts() {
        let mut a = Numbering::per_image();
        let mut b = Numbering::per_image();
        assert_eq!(a.next_serial(), 1);
        assert_eq!(a.next_serial(), 2);
        assert_eq!(b.next_serial(), 1);
    }

    #[test]
    fn numbering_mode_parses_from_cli_strings() {
        assert_eq!(NumberingMode::from_str("batch").unwrap(), NumberingMode::Batch);
        assert_eq!(NumberingMode::from_str("per-image").unwrap(), NumberingMode::PerImage);
        assert_eq!(NumberingMode::PerImage.to_string(), "per-image");
        assert_eq!(NumberingMode::VARIANTS, &["batch", "per-image"]);
    }
}

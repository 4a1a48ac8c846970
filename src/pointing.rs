//! Pointing pattern construction for accepted follow-ups.

use qtty::{Degrees, Hours};

use crate::config::{PointingMode, ScienceConfig};
use crate::models::EquatorialCoordinates;
use crate::window::ObservationWindowResult;

/// Wobble offset used when a program does not configure one.
const DEFAULT_WOBBLE_OFFSET_DEG: f64 = 0.5;

/// One scheduled observation block.
#[derive(Debug, Clone, PartialEq)]
pub struct PointingBlock {
    pub ra: Degrees,
    pub dec: Degrees,
    pub exposure: Hours,
}

/// The full observation pattern of one accepted follow-up.
#[derive(Debug, Clone, PartialEq)]
pub struct PointingPattern {
    pub blocks: Vec<PointingBlock>,
}

/// Wobble offsets for `number_blocks` pointings: the first two blocks
/// offset in right ascension, the rest in declination.
pub fn wobble_offsets(number_blocks: usize, offset: Degrees) -> Vec<(Degrees, Degrees)> {
    (0..number_blocks)
        .map(|i| {
            if i < 2 {
                (offset, Degrees::new(0.0))
            } else {
                (Degrees::new(0.0), offset)
            }
        })
        .collect()
}

/// Build the pointing pattern of one accepted window, or `None` when the
/// window has no usable duration.
///
/// Total observation time is the window duration capped at the program's
/// maximum exposure, split evenly across the blocks.
pub fn produce_pointing_pattern(
    program: &ScienceConfig,
    window: &ObservationWindowResult,
) -> Option<PointingPattern> {
    if !window.valid || window.duration.value() <= 0.0 {
        return None;
    }
    let number_blocks = program.observation.number_blocks;
    if number_blocks == 0 {
        return None;
    }

    let offset = match program.observation.pointing_mode {
        PointingMode::Wobble { offset, .. } => offset,
        PointingMode::OnSource => Degrees::new(DEFAULT_WOBBLE_OFFSET_DEG),
    };
    let total = Hours::new(
        window
            .duration
            .value()
            .min(program.observation.max_exposure.value()),
    );
    let exposure = Hours::new(total.value() / number_blocks as f64);

    let blocks = wobble_offsets(number_blocks, offset)
        .into_iter()
        .map(|(d_ra, d_dec)| PointingBlock {
            ra: Degrees::new(window.target.ra.value() + d_ra.value()),
            dec: Degrees::new(window.target.dec.value() + d_dec.value()),
            exposure,
        })
        .collect();
    Some(PointingPattern { blocks })
}

/// Build a pattern pointing at plugin-vetted positions instead of wobble
/// offsets around the nominal target. One block per position, splitting
/// the capped exposure evenly.
pub fn produce_custom_pointing_pattern(
    program: &ScienceConfig,
    window: &ObservationWindowResult,
    positions: &[EquatorialCoordinates],
) -> Option<PointingPattern> {
    if !window.valid || window.duration.value() <= 0.0 || positions.is_empty() {
        return None;
    }
    let total = window
        .duration
        .value()
        .min(program.observation.max_exposure.value());
    let exposure = Hours::new(total / positions.len() as f64);

    let blocks = positions
        .iter()
        .map(|position| PointingBlock {
            ra: position.ra,
            dec: position.dec,
            exposure,
        })
        .collect();
    Some(PointingPattern { blocks })
}

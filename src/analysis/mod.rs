/// Warning analysis for the flood warning intensity service.
///
/// Submodules, in pipeline order:
/// - `durations`  — infers an episode duration for every warning record.
/// - `scoring`    — duration-weighted annual scores per tidal bucket.
/// - `indicators` — baseline handling and the normalized FWII indices.

pub mod durations;
pub mod indicators;
pub mod scoring;

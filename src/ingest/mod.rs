/// Input decoders for the converters.
///
/// Submodules:
/// - `groundhogs` — nested groundhog prediction JSON → flat prediction rows.
/// - `climdiv`    — NOAA climate-division fixed-width lines → climate rows.
/// - `fixtures` (test only) — representative input payloads.

pub mod climdiv;
pub mod groundhogs;

mod fixtures;

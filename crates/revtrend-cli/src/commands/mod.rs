pub mod export;
pub mod growth;
pub mod import;
pub mod latest;
pub mod parse;
pub mod profiles;

use revtrend_core::error::RevtrendError;
use revtrend_core::profile::{builtin, load_profile, schema::ProfileDef};

use crate::ProfileArgs;

const DEFAULT_PRESET: &str = "nvidia";

/// Load the profile named on the command line, or the default preset.
pub fn resolve_profile(args: &ProfileArgs) -> Result<ProfileDef, RevtrendError> {
    match (&args.profile_file, &args.profile) {
        (Some(path), _) => load_profile(path),
        (None, Some(name)) => builtin::load_preset(name),
        (None, None) => builtin::load_preset(DEFAULT_PRESET),
    }
}

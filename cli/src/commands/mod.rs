//! CLI command implementations

pub mod dump;
pub mod load;

use crate::output;
use strata_migrations::Target;

/// Print which environment, adapter and database a command works on
fn report_target(target: &Target) {
    if target.defaulted {
        println!(
            "{}",
            output::warn_line(&format!(
                "no environment specified, defaulting to: {}",
                target.environment
            ))
        );
    } else {
        println!("{}", output::setting("using environment", &target.environment));
    }
    println!("{}", output::setting("using adapter", &target.env.adapter));
    println!("{}", output::setting("using database", &target.env.name));
}

//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `folio_core` linkage.
//! - Print the shipped data's shape for quick local sanity checks.

use folio_core::{baseline_portfolio, Section};

fn main() {
    println!("folio_core ping={}", folio_core::ping());
    println!("folio_core version={}", folio_core::core_version());

    let baseline = baseline_portfolio();
    if let Err(err) = baseline.validate() {
        eprintln!("folio_core baseline invalid: {err}");
        std::process::exit(1);
    }
    for section in Section::ALL {
        let count = match section {
            Section::Projects => baseline.projects.len(),
            Section::Skills => baseline.skills.len(),
            Section::Experience => baseline.experience.len(),
            Section::Education => baseline.education.len(),
            Section::PersonalInfo | Section::Contact => 1,
        };
        println!("baseline {section}={count}");
    }
}

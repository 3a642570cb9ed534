mod progress;
mod styling;
mod summary;
mod tables;

pub use progress::FetchProgress;
pub use summary::print_summary;

use styling::{bug, failure, muted};

/// Prints the tool name, version and a legend of the two signals to stderr.
pub fn print_banner() {
    eprintln!(
        "\n🌶️ {} {}\n  {} closed bug issues   {} failed workflow runs\n",
        bug("Spicy Contributions"),
        muted(concat!("v", env!("CARGO_PKG_VERSION"))),
        bug("■"),
        failure("■"),
    );
}

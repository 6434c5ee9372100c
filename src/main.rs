//! logipunch main entrypoint.

use logipunch::run;
use logipunch::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}

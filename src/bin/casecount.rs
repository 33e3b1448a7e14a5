use std::error::Error;
use std::io;

fn main() -> Result<(), Box<dyn Error>> {
    casecount::app::run(std::env::args().skip(1), &mut io::stdout().lock())
}

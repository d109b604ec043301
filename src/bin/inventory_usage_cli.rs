use inventory_usage::{cli::run_cli, init};

fn main() {
    init();

    match run_cli() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

use campus_placement_api::run;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("campus placement error: {err}");
        std::process::exit(1);
    }
}

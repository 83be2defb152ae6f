//! Donation Site - binary entry point
//! Delegates to the library for all app logic.

#[tokio::main]
async fn main() {
    // `run` has already logged the cause.
    if donation_site::run().await.is_err() {
        std::process::exit(1);
    }
}

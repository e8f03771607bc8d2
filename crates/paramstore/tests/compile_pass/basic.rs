use std::time::Duration;

use paramstore::Parameters;

#[derive(Default, Parameters)]
struct Config {
    #[param("/app/name")]
    name: String,

    #[param("/app/port")]
    port: u16,

    #[param("/app/debug")]
    debug: bool,

    #[param("/app/timeout")]
    timeout: Duration,

    #[param("/app/token,decrypt")]
    token: Option<String>,

    #[param("/app/hosts")]
    hosts: Vec<String>,

    #[param("-")]
    skipped: String,

    r#type: String,
}

fn main() {
    let store = paramstore::store::MemoryStore::new();
    let _ = paramstore::Loader::new(&store).load(&mut Config::default());
}

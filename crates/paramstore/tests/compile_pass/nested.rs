use paramstore::Parameters;

#[derive(Default, Parameters)]
struct Database {
    #[param("/{{.env}}/db/url,decrypt")]
    url: String,
}

#[derive(Default, Parameters)]
struct App<T: paramstore::Bind + Default> {
    #[param("/{{.env}}/value")]
    value: T,

    #[param(flatten)]
    database: Database,

    #[param(flatten)]
    replica: Option<Box<Database>>,
}

fn main() {
    let store = paramstore::store::MemoryStore::new();
    let params = serde_json::json!({ "env": "dev" });
    let _ = paramstore::Loader::new(&store).load_with_parameters(&mut App::<u32>::default(), &params);
}

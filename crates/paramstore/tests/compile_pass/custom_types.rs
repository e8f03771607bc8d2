use std::collections::HashMap;

use paramstore::{BoxError, DecodeParameter, Parameters, custom_parameter, json_parameter};

#[derive(Default)]
struct Upper(String);

impl DecodeParameter for Upper {
    fn decode_parameter(&mut self, value: &str) -> Result<(), BoxError> {
        self.0 = value.to_uppercase();
        Ok(())
    }
}

custom_parameter!(Upper);

#[derive(Default, serde::Deserialize)]
struct Limits {
    rps: u32,
}

json_parameter!(Limits);

#[derive(Default, Parameters)]
struct Config {
    #[param("/app/region")]
    region: Upper,

    #[param("/app/limits,json")]
    limits: Limits,

    #[param("/app/labels,json")]
    labels: HashMap<String, String>,

    #[param("/app/raw,json")]
    raw: serde_json::Value,
}

fn main() {
    let config = Config::default();
    let _ = (config.region.0, config.limits.rps, config.labels, config.raw);
}

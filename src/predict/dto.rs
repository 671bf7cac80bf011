use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct PredictForm {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub num_houses: String,
}

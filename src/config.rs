//! This module implements the config for training a decision tree.
//!

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Config {
    pub feature_size: usize,
    pub max_depth: u32,
    pub node_min: usize,
    pub leaf_min: usize,
    pub feature_sample_ratio: f64,
    pub debug: bool,
}

impl Config {
    pub fn new() -> Config {
        Config {
            feature_size: 1,
            max_depth: 2,
            node_min: 2,
            leaf_min: 1,
            feature_sample_ratio: 1.0,
            debug: false,
        }
    }

    pub fn set_feature_size(&mut self, n: usize) {
        self.feature_size = n;
    }

    pub fn set_max_depth(&mut self, n: u32) {
        self.max_depth = n;
    }

    pub fn set_node_min(&mut self, n: usize) {
        self.node_min = n;
    }

    pub fn set_leaf_min(&mut self, n: usize) {
        self.leaf_min = n;
    }

    pub fn set_feature_sample_ratio(&mut self, n: f64) {
        self.feature_sample_ratio = n;
    }

    pub fn set_debug(&mut self, option: bool) {
        self.debug = option;
    }

    pub fn to_string(&self) -> String {
        let mut s = String::from("");
        s.push_str(&format!("number of features = {}\n", self.feature_size));
        s.push_str(&format!("maximum depth = {}\n", self.max_depth));
        s.push_str(&format!("minimum node size = {}\n", self.node_min));
        s.push_str(&format!("minimum leaf size = {}\n", self.leaf_min));
        s.push_str(&format!(
            "feature sample ratio = {}\n",
            self.feature_sample_ratio
        ));
        s.push_str(&format!("debug enabled = {}\n", self.debug));
        s
    }
}

//! This module implements a binary decision tree classifier for continuous
//! features and numerically encoded class labels.
//!
//! In the training process, the nodes are splited according to the Gini
//! impurity of the label subsets they would produce.
//!
//! Following hyperparameters are supported:
//!
//! 1. feature_size: the size of feautures. Training data and test data should
//!    have same feature_size. (default = 1)
//!
//! 2. max_depth: the max depth of the decision tree. The root node is
//!    considered to be in the layer 1, and splitting stops at this layer.
//!    (default = 2)
//!
//! 3. node_min: the minimum number of samples a node must hold for its split
//!    to be recursed into. A smaller side becomes a leaf. (default = 2)
//!
//! 4. leaf_min: the minimum number of samples required on each side of a
//!    candidate split for the candidate to be considered during the split
//!    search. (default = 1)
//!
//! 5. feature_sample_ratio: portion of features to be splited. When spliting a
//!    node, a subset of the features (feature_size * feature_sample_ratio)
//!    will be randomly selected to calculate impurity. (default = 1.0)
//!
//! # Example
//! ```
//! use cart::decision_tree::{Data, DecisionTree};
//! // set up training data
//! let mut dv = Vec::new();
//! dv.push(Data::new_training_data(vec![1.0], 0));
//! dv.push(Data::new_training_data(vec![2.0], 0));
//! dv.push(Data::new_training_data(vec![3.0], 0));
//! dv.push(Data::new_training_data(vec![10.0], 1));
//! dv.push(Data::new_training_data(vec![11.0], 1));
//! dv.push(Data::new_training_data(vec![12.0], 1));
//!
//! // train a decision tree
//! let mut tree = DecisionTree::new();
//! tree.set_feature_size(1);
//! tree.set_max_depth(2);
//! tree.set_leaf_min(1);
//! tree.fit(&dv).unwrap();
//!
//! // inference the training data with the decision tree
//! let probabilities = tree.predict(&dv).unwrap();
//! assert_eq!(probabilities[0][&0], 1.0);
//! assert_eq!(probabilities[5][&1], 1.0);
//! ```

use crate::config::Config;
use crate::errors::{CartError, Result};
#[cfg(feature = "enable_training")]
use crate::fitness::{impurity, weighted_impurity};

use std::collections::HashMap;

#[cfg(feature = "enable_training")]
use rand::prelude::SliceRandom;
#[cfg(feature = "enable_training")]
use rand::thread_rng;

use serde_derive::{Deserialize, Serialize};

///! For now we only support std::$t using this macro.
/// We will generalize ValueType in future.
macro_rules! def_value_type {
    ($t: tt) => {
        pub type ValueType = $t;
        pub const VALUE_TYPE_MAX: ValueType = std::$t::MAX;
        pub const VALUE_TYPE_MIN: ValueType = std::$t::MIN;
    };
}

// use continous variables for decision tree
def_value_type!(f32);

/// The numeric identifier of a class. Labels are treated as discrete class ids
/// of small cardinality.
pub type ClassLabel = u32;

/// A leaf's mapping from class label to predicted probability. The values lie
/// in [0, 1] and sum to 1 over the classes observed at the leaf.
pub type Probabilities = HashMap<ClassLabel, f64>;

/// A training sample or a test sample. You can call `new_training_data` to
/// generate a training sample, and call `new_test_data` to generate a test
/// sample. A training sample can be used as a test sample; the label of a test
/// sample is ignored during inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Data {
    /// the vector of features
    pub feature: Vec<ValueType>,
    /// sample's class label. Used in training.
    pub label: ClassLabel,
}

impl Data {
    /// Generate a training sample from a feature vector and its class label.
    ///
    /// # Example
    /// ``` rust
    /// use cart::decision_tree::Data;
    /// let data1 = Data::new_training_data(vec![1.0, 2.0, 3.0], 1);
    /// ```
    pub fn new_training_data(feature: Vec<ValueType>, label: ClassLabel) -> Self {
        Data { feature, label }
    }

    /// Generate a test sample. The label is set to a placeholder value.
    ///
    /// # Example
    /// ``` rust
    /// use cart::decision_tree::Data;
    /// let data1 = Data::new_test_data(vec![1.0, 2.0, 3.0]);
    /// ```
    pub fn new_test_data(feature: Vec<ValueType>) -> Self {
        Data { feature, label: 0 }
    }
}

/// The vector of the samples
pub type DataVec = Vec<Data>;

/// A split chosen by the split search: the feature to compare, the threshold
/// to compare against, and the weighted impurity the split achieves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    /// the feature used to split the node
    pub feature_index: usize,
    /// the feature value used to split the node
    pub threshold: ValueType,
    /// the weighted impurity achieved by this split
    pub impurity: f64,
}

/// A node of the decision tree. Internal nodes route samples by comparing one
/// feature against a threshold; leaf nodes carry the class probabilities
/// estimated from the labels routed to them. Each node exclusively owns its
/// children, so a tree has no cycles and no shared subtrees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    Internal {
        /// the feature used to split the node
        feature_index: usize,
        /// the feature value used to split the node
        threshold: ValueType,
        /// the weighted impurity achieved by the split
        impurity: f64,
        /// the depth of this node. The root node is at depth 1.
        depth: u32,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
    Leaf {
        /// mapping from class label to its empirical frequency at this leaf
        probabilities: Probabilities,
    },
}

impl TreeNode {
    /// Return whether the node is a leaf node.
    pub fn is_leaf(&self) -> bool {
        match self {
            TreeNode::Leaf { .. } => true,
            TreeNode::Internal { .. } => false,
        }
    }

    /// Return the number of nodes in the subtree rooted at this node.
    pub fn len(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Internal { left, right, .. } => 1 + left.len() + right.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Inference one feature vector from this node down. At each internal node
    /// the sample routes left if its value at the node's feature index is
    /// strictly less than the threshold, otherwise right, until a leaf is
    /// reached. Returns the leaf's probability mapping unchanged.
    ///
    /// Returns an error if the feature vector is shorter than a referenced
    /// feature index.
    pub fn predict(&self, feature: &[ValueType]) -> Result<&Probabilities> {
        match self {
            TreeNode::Leaf { probabilities } => Ok(probabilities),
            TreeNode::Internal {
                feature_index,
                threshold,
                left,
                right,
                ..
            } => {
                if *feature_index >= feature.len() {
                    return Err(CartError::IndexOutOfRange(*feature_index, feature.len()));
                }
                // same routing rule as partition()
                if feature[*feature_index] < *threshold {
                    left.predict(feature)
                } else {
                    right.predict(feature)
                }
            }
        }
    }
}

/// The decision tree.
#[derive(Debug, Serialize, Deserialize)]
pub struct DecisionTree {
    /// the tree. None until `fit` succeeds.
    tree: Option<TreeNode>,
    /// the size of feautures. Training data and test data should have same
    /// feature size.
    feature_size: usize,
    /// the max depth of the decision tree. The root node is at depth 1.
    max_depth: u32,
    /// the minimum number of samples required for a node to be splited further
    /// during training.
    node_min: usize,
    /// the minimum number of samples required on each side of a candidate
    /// split during the split search.
    leaf_min: usize,
    /// portion of features to be splited. When spliting a node, a subset of
    /// the features (feature_size * feature_sample_ratio) will be randomly
    /// selected to calculate impurity.
    feature_sample_ratio: f64,
    /// whether to print the tree after training. For debug use.
    debug: bool,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionTree {
    /// Return a new decision tree with default values (feature_size = 1,
    /// max_depth = 2, node_min = 2, leaf_min = 1, feature_sample_ratio = 1.0)
    ///
    /// # Example
    /// ```
    /// use cart::decision_tree::DecisionTree;
    /// let mut tree = DecisionTree::new();
    /// ```
    pub fn new() -> Self {
        DecisionTree {
            tree: None,
            feature_size: 1,
            max_depth: 2,
            node_min: 2,
            leaf_min: 1,
            feature_sample_ratio: 1.0,
            debug: false,
        }
    }

    /// Return a new decision tree with the hyperparameters taken from `conf`.
    ///
    /// # Example
    /// ```
    /// use cart::config::Config;
    /// use cart::decision_tree::DecisionTree;
    /// let mut cfg = Config::new();
    /// cfg.set_feature_size(4);
    /// cfg.set_max_depth(3);
    /// let mut tree = DecisionTree::from_config(&cfg);
    /// ```
    pub fn from_config(conf: &Config) -> Self {
        DecisionTree {
            tree: None,
            feature_size: conf.feature_size,
            max_depth: conf.max_depth,
            node_min: conf.node_min,
            leaf_min: conf.leaf_min,
            feature_sample_ratio: conf.feature_sample_ratio,
            debug: conf.debug,
        }
    }

    /// Set the size of feautures. Training data and test data should have same
    /// feature size.
    ///
    /// # Example
    /// ```
    /// use cart::decision_tree::DecisionTree;
    /// let mut tree = DecisionTree::new();
    /// tree.set_feature_size(3);
    /// ```
    pub fn set_feature_size(&mut self, size: usize) {
        self.feature_size = size;
    }

    /// Set the max depth of the decision tree. The root node is at depth 1 and
    /// splitting stops at this depth.
    /// # Example
    /// ```
    /// use cart::decision_tree::DecisionTree;
    /// let mut tree = DecisionTree::new();
    /// tree.set_max_depth(2);
    /// ```
    pub fn set_max_depth(&mut self, max_depth: u32) {
        self.max_depth = max_depth;
    }

    /// Set the minimum number of samples a node must hold for its split to be
    /// recursed into during training.
    /// # Example
    /// ```
    /// use cart::decision_tree::DecisionTree;
    /// let mut tree = DecisionTree::new();
    /// tree.set_node_min(2);
    /// ```
    pub fn set_node_min(&mut self, node_min: usize) {
        self.node_min = node_min;
    }

    /// Set the minimum number of samples required on each side of a candidate
    /// split for the candidate to be considered during the split search.
    /// # Example
    /// ```
    /// use cart::decision_tree::DecisionTree;
    /// let mut tree = DecisionTree::new();
    /// tree.set_leaf_min(1);
    /// ```
    pub fn set_leaf_min(&mut self, leaf_min: usize) {
        self.leaf_min = leaf_min;
    }

    /// Set the portion of features to be splited. When spliting a node, a
    /// subset of the features (feature_size * feature_sample_ratio) will be
    /// randomly selected to calculate impurity. With the default ratio of 1.0
    /// the split search is exhaustive and deterministic.
    /// # Example
    /// ```
    /// use cart::decision_tree::DecisionTree;
    /// let mut tree = DecisionTree::new();
    /// tree.set_feature_sample_ratio(0.9);
    /// ```
    pub fn set_feature_sample_ratio(&mut self, feature_sample_ratio: f64) {
        self.feature_sample_ratio = feature_sample_ratio;
    }

    /// Set whether the tree is printed after training. For debug use.
    pub fn set_debug(&mut self, option: bool) {
        self.debug = option;
    }

    /// Return the root node, or None if the tree has not been trained.
    pub fn root(&self) -> Option<&TreeNode> {
        self.tree.as_ref()
    }

    /// Use the samples in `train_data` to train the decision tree.
    ///
    /// The training set must not be empty, every sample must have exactly
    /// `feature_size` features, and `max_depth` and `leaf_min` must be
    /// positive. A training call that fails leaves no tree behind.
    ///
    /// # Example
    /// ```
    /// use cart::decision_tree::{Data, DecisionTree};
    /// // set up training data
    /// let mut dv = Vec::new();
    /// dv.push(Data::new_training_data(vec![1.0, 2.0, 3.0], 0));
    /// dv.push(Data::new_training_data(vec![1.1, 2.1, 3.1], 0));
    /// dv.push(Data::new_training_data(vec![2.0, 2.0, 1.0], 1));
    /// dv.push(Data::new_training_data(vec![2.0, 2.3, 1.2], 1));
    ///
    /// // train a decision tree
    /// let mut tree = DecisionTree::new();
    /// tree.set_feature_size(3);
    /// tree.set_max_depth(2);
    /// tree.set_leaf_min(1);
    /// tree.fit(&dv).unwrap();
    /// ```
    #[cfg(feature = "enable_training")]
    pub fn fit(&mut self, train_data: &DataVec) -> Result<()> {
        if train_data.is_empty() {
            return Err(CartError::from("the training set is empty"));
        }
        if self.max_depth == 0 {
            return Err(CartError::from("max_depth must be positive"));
        }
        if self.leaf_min == 0 {
            return Err(CartError::from("leaf_min must be positive"));
        }
        for data in train_data.iter() {
            if data.feature.len() != self.feature_size {
                return Err(CartError::InvalidArgument(format!(
                    "expected {} features per sample, got {}",
                    self.feature_size,
                    data.feature.len()
                )));
            }
        }

        // a failed training call must not leave a stale tree behind
        self.tree = None;

        let subset: Vec<usize> = (0..train_data.len()).collect();
        let root = self.fit_node(train_data, &subset, 1)?;
        self.tree = Some(root);

        if self.debug {
            self.print();
        }
        Ok(())
    }

    /// Recursively build the tree nodes. It chooses a feature and a threshold
    /// to split the node and the data, and then uses the splited data to build
    /// the child nodes.
    ///
    /// A subset whose labels are already pure becomes a leaf immediately.
    /// Otherwise the node is split, even when `depth` already equals
    /// `max_depth`; the depth limit gates the children, not the split itself.
    #[cfg(feature = "enable_training")]
    fn fit_node(&self, train_data: &DataVec, subset: &[usize], depth: u32) -> Result<TreeNode> {
        let labels = collect_labels(train_data, subset);
        let (score, _) = impurity(&labels)?;
        if score == 0.0 {
            return Ok(DecisionTree::leaf(&labels));
        }

        let split = self.search_split(train_data, subset)?;
        let (left, right) = partition(train_data, subset, split.feature_index, split.threshold);

        let left_child = self.fit_side(train_data, &left, depth)?;
        let right_child = self.fit_side(train_data, &right, depth)?;

        Ok(TreeNode::Internal {
            feature_index: split.feature_index,
            threshold: split.threshold,
            impurity: split.impurity,
            depth,
            left: Box::new(left_child),
            right: Box::new(right_child),
        })
    }

    /// Decide for one side of a split whether to emit a leaf or to recurse.
    /// The side becomes a leaf if it is pure, smaller than `node_min`, or the
    /// parent already sits at `max_depth`.
    #[cfg(feature = "enable_training")]
    fn fit_side(&self, train_data: &DataVec, subset: &[usize], depth: u32) -> Result<TreeNode> {
        let labels = collect_labels(train_data, subset);
        let (score, count) = impurity(&labels)?;
        if score == 0.0 || count < self.node_min || depth == self.max_depth {
            return Ok(DecisionTree::leaf(&labels));
        }
        self.fit_node(train_data, subset, depth + 1)
    }

    /// Build a leaf node predicting the empirical class frequencies of
    /// `labels`.
    #[cfg(feature = "enable_training")]
    fn leaf(labels: &[ClassLabel]) -> TreeNode {
        let mut counts: HashMap<ClassLabel, usize> = HashMap::new();
        for label in labels.iter() {
            *counts.entry(*label).or_insert(0) += 1;
        }

        let total = labels.len() as f64;
        let mut probabilities = Probabilities::new();
        for (label, count) in counts {
            probabilities.insert(label, (count as f64) / total);
        }
        TreeNode::Leaf { probabilities }
    }

    /// Exhaustively search the best split for the rows in `subset`.
    ///
    /// Every observed feature value is a candidate threshold: for every row of
    /// the subset, in order, and every feature index, in ascending order, the
    /// row's value at that feature is tried. Each candidate partitions the
    /// whole subset; candidates leaving either side below `leaf_min` are
    /// skipped. The candidate with the lowest weighted impurity wins, and the
    /// first candidate encountered wins ties, so repeated searches over the
    /// same data return the same split.
    ///
    /// When `feature_sample_ratio` is below 1.0 only a random subset of the
    /// features is tried.
    ///
    /// Returns `NoValidSplit` if no candidate satisfies `leaf_min`.
    ///
    /// # Example
    /// ```
    /// use cart::decision_tree::{Data, DecisionTree};
    /// let mut dv = Vec::new();
    /// dv.push(Data::new_training_data(vec![1.0], 0));
    /// dv.push(Data::new_training_data(vec![2.0], 0));
    /// dv.push(Data::new_training_data(vec![10.0], 1));
    /// dv.push(Data::new_training_data(vec![11.0], 1));
    ///
    /// let mut tree = DecisionTree::new();
    /// tree.set_feature_size(1);
    /// tree.set_leaf_min(1);
    /// let subset: Vec<usize> = (0..dv.len()).collect();
    /// let split = tree.search_split(&dv, &subset).unwrap();
    /// assert_eq!(split.feature_index, 0);
    /// assert_eq!(split.threshold, 10.0);
    /// assert_eq!(split.impurity, 0.0);
    /// ```
    #[cfg(feature = "enable_training")]
    pub fn search_split(&self, train_data: &DataVec, subset: &[usize]) -> Result<Split> {
        for &row in subset.iter() {
            if train_data[row].feature.len() < self.feature_size {
                return Err(CartError::InvalidArgument(format!(
                    "expected {} features per sample, got {}",
                    self.feature_size,
                    train_data[row].feature.len()
                )));
            }
        }

        let mut fs = self.feature_size;
        let mut fv: Vec<usize> = (0..fs).collect();
        if self.feature_sample_ratio < 1.0 {
            fs = (self.feature_sample_ratio * (self.feature_size as f64)) as usize;
            let mut rng = thread_rng();
            fv.shuffle(&mut rng);
        }

        // the worst possible Gini value, so any valid candidate improves on it
        let mut best_impurity: f64 = 1.0;
        let mut best: Option<Split> = None;

        for &row in subset.iter() {
            for feature_index in fv.iter().take(fs) {
                let threshold = train_data[row].feature[*feature_index];
                let (left, right) = partition(train_data, subset, *feature_index, threshold);
                if left.len() < self.leaf_min || right.len() < self.leaf_min {
                    continue;
                }
                let left_labels = collect_labels(train_data, &left);
                let right_labels = collect_labels(train_data, &right);
                let score = weighted_impurity(&left_labels, &right_labels)?;
                if score < best_impurity {
                    best_impurity = score;
                    best = Some(Split {
                        feature_index: *feature_index,
                        threshold,
                        impurity: score,
                    });
                }
            }
        }

        best.ok_or(CartError::NoValidSplit)
    }

    /// Inference the values of samples in the `test_data`. Return one
    /// probability mapping per sample.
    ///
    /// # Example
    /// ```
    /// use cart::decision_tree::{Data, DecisionTree};
    /// let mut dv = Vec::new();
    /// dv.push(Data::new_training_data(vec![1.0], 0));
    /// dv.push(Data::new_training_data(vec![2.0], 0));
    /// dv.push(Data::new_training_data(vec![10.0], 1));
    /// dv.push(Data::new_training_data(vec![11.0], 1));
    ///
    /// let mut tree = DecisionTree::new();
    /// tree.set_feature_size(1);
    /// tree.set_max_depth(2);
    /// tree.set_leaf_min(1);
    /// tree.fit(&dv).unwrap();
    ///
    /// let probabilities = tree.predict(&dv).unwrap();
    /// assert_eq!(probabilities.len(), 4);
    /// assert_eq!(probabilities[0][&0], 1.0);
    /// ```
    pub fn predict(&self, test_data: &DataVec) -> Result<Vec<Probabilities>> {
        let root = match self.tree.as_ref() {
            Some(root) => root,
            None => return Err(CartError::from("the decision tree is not trained")),
        };

        // Inference the data one by one
        let mut ret = Vec::with_capacity(test_data.len());
        for data in test_data.iter() {
            ret.push(root.predict(&data.feature)?.clone());
        }
        Ok(ret)
    }

    /// Inference a single feature vector. Return a borrow of the probability
    /// mapping of the leaf the sample is routed to.
    pub fn predict_single(&self, feature: &[ValueType]) -> Result<&Probabilities> {
        match self.tree.as_ref() {
            Some(root) => root.predict(feature),
            None => Err(CartError::from("the decision tree is not trained")),
        }
    }

    /// Print the decision tree. For debug use.
    ///
    /// # Example
    /// ```
    /// use cart::decision_tree::{Data, DecisionTree};
    /// let mut dv = Vec::new();
    /// dv.push(Data::new_training_data(vec![1.0], 0));
    /// dv.push(Data::new_training_data(vec![2.0], 1));
    /// let mut tree = DecisionTree::new();
    /// tree.set_feature_size(1);
    /// tree.fit(&dv).unwrap();
    /// tree.print();
    ///
    /// // output:
    /// //----feature[0] < 2
    /// //    ----Leaf {0: 1.0}
    /// //    ----Leaf {1: 1.0}
    /// ```
    pub fn print(&self) {
        let root = match self.tree.as_ref() {
            Some(root) => root,
            None => return,
        };

        let mut stack: Vec<(usize, &TreeNode)> = Vec::new();
        stack.push((0, root));
        while let Some((deep, node)) = stack.pop() {
            for _i in 0..deep {
                print!("    ");
            }
            match node {
                TreeNode::Leaf { probabilities } => {
                    println!("----Leaf {:?}", probabilities);
                }
                TreeNode::Internal {
                    feature_index,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    println!("----feature[{}] < {}", feature_index, threshold);
                    stack.push((deep + 1, right));
                    stack.push((deep + 1, left));
                }
            }
        }
    }

    /// Return the number of nodes in the decision tree. An untrained tree has
    /// zero nodes.
    pub fn len(&self) -> usize {
        match self.tree.as_ref() {
            Some(root) => root.len(),
            None => 0,
        }
    }

    /// Returns true if the current decision tree is empty
    pub fn is_empty(&self) -> bool {
        self.tree.is_none()
    }
}

/// Partition the rows in `subset` by the routing rule: a row goes left if its
/// value at `feature_index` is strictly less than `threshold`, otherwise
/// right. Every row lands on exactly one side and the subset order is
/// preserved. The same rule routes samples during prediction.
#[cfg(feature = "enable_training")]
pub fn partition(
    train_data: &DataVec,
    subset: &[usize],
    feature_index: usize,
    threshold: ValueType,
) -> (Vec<usize>, Vec<usize>) {
    let mut left: Vec<usize> = Vec::new();
    let mut right: Vec<usize> = Vec::new();
    for &row in subset.iter() {
        if train_data[row].feature[feature_index] < threshold {
            left.push(row);
        } else {
            right.push(row);
        }
    }
    (left, right)
}

/// Collect the labels of the rows in `subset`.
#[cfg(feature = "enable_training")]
fn collect_labels(train_data: &DataVec, subset: &[usize]) -> Vec<ClassLabel> {
    subset.iter().map(|&row| train_data[row].label).collect()
}

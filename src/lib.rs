//Copyright (C) 2017-2018 Baidu, Inc. All Rights Reserved.
//
//Redistribution and use in source and binary forms, with or without
//modification, are permitted provided that the following conditions
//are met:
//
// * Redistributions of source code must retain the above copyright
//   notice, this list of conditions and the following disclaimer.
//
// * Redistributions in binary form must reproduce the above copyright
//   notice, this list of conditions and the following disclaimer in
//   the documentation and/or other materials provided with the
//   distribution.
//
// * Neither the name of Baidu, Inc., nor the names of its
//   contributors may be used to endorse or promote products derived
//   from this software without specific prior written permission.
//
//THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
//"AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
//LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
//A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT
//OWNER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
//SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
//LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; Loss OF USE,
//DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY
//THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
//(INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
//OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

#![allow(clippy::ptr_arg)]

extern crate rand;
extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod config;
pub mod decision_tree;
pub mod errors;
pub mod fitness;
#[cfg(feature = "input")]
pub mod input;

#[cfg(test)]
mod tests {
    use crate::decision_tree::TreeNode;

    /// Largest depth recorded on any internal node of the subtree.
    fn max_internal_depth(node: &TreeNode) -> u32 {
        match node {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Internal {
                depth, left, right, ..
            } => {
                let l = max_internal_depth(left);
                let r = max_internal_depth(right);
                (*depth).max(l).max(r)
            }
        }
    }

    #[test]
    fn it_works() {
        assert_eq!(2 + 2, 4);
    }

    #[test]
    fn gini_impurity() {
        use crate::fitness::impurity;

        let (score, count) = impurity(&[0, 0, 0, 0]).unwrap();
        assert_eq!(score, 0.0);
        assert_eq!(count, 4);

        let (score, _) = impurity(&[7]).unwrap();
        assert_eq!(score, 0.0);

        let (score, _) = impurity(&[0, 0, 0, 1]).unwrap();
        assert!((score - 0.375).abs() < 1e-9);

        let (score, _) = impurity(&[0, 1, 2, 0, 1, 2]).unwrap();
        assert!((score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn gini_impurity_bounds() {
        use crate::fitness::impurity;

        // three distinct classes, so the score stays within [0, 1 - 1/3]
        let (score, _) = impurity(&[0, 1, 0, 1, 2, 2, 1, 0]).unwrap();
        assert!(score >= 0.0);
        assert!(score <= 1.0 - 1.0 / 3.0 + 1e-9);
    }

    #[test]
    fn empty_impurity_is_an_error() {
        use crate::errors::CartError;
        use crate::fitness::impurity;

        match impurity(&[]) {
            Err(CartError::InvalidArgument(_)) => {}
            _ => panic!("expected an InvalidArgument error"),
        }
    }

    #[test]
    fn weighted_gini() {
        use crate::fitness::weighted_impurity;

        let score = weighted_impurity(&[0, 0, 0], &[1, 1, 1]).unwrap();
        assert_eq!(score, 0.0);

        let score = weighted_impurity(&[0, 1], &[0, 1]).unwrap();
        assert!((score - 0.5).abs() < 1e-9);

        // isolating a single sample scores little better than no split
        let score = weighted_impurity(&[0], &[0, 0, 1, 1, 1]).unwrap();
        assert!((score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn labels_same() {
        use crate::fitness::same;

        assert_eq!(true, same(&[2, 2, 2]));
        assert_eq!(false, same(&[1, 2]));
        assert_eq!(false, same(&[]));
    }

    #[test]
    fn most_likely_class() {
        use crate::decision_tree::Probabilities;
        use crate::fitness::most_likely;

        let mut probabilities = Probabilities::new();
        assert_eq!(most_likely(&probabilities), None);

        probabilities.insert(0, 0.25);
        probabilities.insert(1, 0.75);
        assert_eq!(most_likely(&probabilities), Some(1));

        // ties go to the smallest label
        let mut probabilities = Probabilities::new();
        probabilities.insert(3, 0.5);
        probabilities.insert(1, 0.5);
        assert_eq!(most_likely(&probabilities), Some(1));
    }

    #[test]
    fn accuracy_metric() {
        use crate::decision_tree::{Data, Probabilities};
        use crate::fitness::accuracy;

        let dv = vec![
            Data::new_training_data(vec![1.0], 0),
            Data::new_training_data(vec![2.0], 1),
        ];
        let mut probabilities = Probabilities::new();
        probabilities.insert(0, 1.0);
        let predicted = vec![probabilities.clone(), probabilities];
        assert!((accuracy(&dv, &predicted) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn partition_is_complete() {
        use crate::decision_tree::{partition, Data};

        let features: Vec<f32> = vec![3.0, 1.0, 4.0, 1.5, 9.0, 2.6];
        let mut dv = Vec::new();
        for f in features.iter() {
            dv.push(Data::new_training_data(vec![*f], 0));
        }
        let subset: Vec<usize> = (0..dv.len()).collect();

        let (left, right) = partition(&dv, &subset, 0, 2.6);
        assert_eq!(left.len() + right.len(), dv.len());
        for row in 0..dv.len() {
            assert!(left.contains(&row) != right.contains(&row));
        }
        assert_eq!(left, vec![1, 3]);
        assert_eq!(right, vec![0, 2, 4, 5]);
    }

    #[test]
    fn perfect_split() {
        use crate::decision_tree::{Data, DecisionTree};

        let features: Vec<f32> = vec![1.0, 2.0, 3.0, 10.0, 11.0, 12.0];
        let labels: Vec<u32> = vec![0, 0, 0, 1, 1, 1];
        let mut dv = Vec::new();
        for (f, l) in features.iter().zip(labels.iter()) {
            dv.push(Data::new_training_data(vec![*f], *l));
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.set_max_depth(2);
        tree.set_leaf_min(1);

        let subset: Vec<usize> = (0..dv.len()).collect();
        let split = tree.search_split(&dv, &subset).unwrap();
        assert_eq!(split.feature_index, 0);
        assert_eq!(split.threshold, 10.0);
        assert_eq!(split.impurity, 0.0);

        tree.fit(&dv).unwrap();
        assert_eq!(tree.len(), 3);

        let probabilities = tree.predict(&dv).unwrap();
        assert_eq!(probabilities[0].len(), 1);
        assert_eq!(probabilities[0][&0], 1.0);
        assert_eq!(probabilities[5].len(), 1);
        assert_eq!(probabilities[5][&1], 1.0);
    }

    #[test]
    fn deterministic_split() {
        use crate::decision_tree::{Data, DecisionTree};

        let features: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let labels: Vec<u32> = vec![0, 0, 1, 1, 0, 0];
        let mut dv = Vec::new();
        for (f, l) in features.iter().zip(labels.iter()) {
            dv.push(Data::new_training_data(vec![*f], *l));
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.set_leaf_min(1);

        let subset: Vec<usize> = (0..dv.len()).collect();
        let first = tree.search_split(&dv, &subset).unwrap();
        let second = tree.search_split(&dv, &subset).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn pure_labels_make_a_single_leaf() {
        use crate::decision_tree::{Data, DecisionTree};

        let mut dv = Vec::new();
        for f in [1.0f32, 2.0, 3.0, 4.0].iter() {
            dv.push(Data::new_training_data(vec![*f], 7));
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.fit(&dv).unwrap();

        assert_eq!(tree.len(), 1);
        assert!(tree.root().unwrap().is_leaf());

        let probabilities = tree.predict_single(&[100.0]).unwrap();
        assert_eq!(probabilities.len(), 1);
        assert_eq!(probabilities[&7], 1.0);
    }

    #[test]
    fn depth_limit_overrides_purity_seeking() {
        use crate::decision_tree::{Data, DecisionTree, TreeNode};

        // separating the middle block perfectly would need two levels
        let features: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let labels: Vec<u32> = vec![0, 0, 1, 1, 0, 0];
        let mut dv = Vec::new();
        for (f, l) in features.iter().zip(labels.iter()) {
            dv.push(Data::new_training_data(vec![*f], *l));
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.set_max_depth(1);
        tree.set_leaf_min(1);
        tree.fit(&dv).unwrap();

        // the root still splits at max_depth, but both children are leaves
        assert_eq!(tree.len(), 3);
        match tree.root().unwrap() {
            TreeNode::Internal {
                threshold,
                impurity,
                depth,
                left,
                right,
                ..
            } => {
                assert_eq!(*depth, 1);
                assert_eq!(*threshold, 3.0);
                assert!((*impurity - 1.0 / 3.0).abs() < 1e-9);
                assert!(left.is_leaf());
                assert!(right.is_leaf());
                match &**right {
                    TreeNode::Leaf { probabilities } => {
                        assert_eq!(probabilities[&0], 0.5);
                        assert_eq!(probabilities[&1], 0.5);
                    }
                    _ => panic!("expected a leaf on the right side"),
                }
            }
            _ => panic!("expected an internal root"),
        }
    }

    #[test]
    fn no_valid_split_is_surfaced() {
        use crate::decision_tree::{Data, DecisionTree};
        use crate::errors::CartError;

        // every feature value is identical, so every candidate leaves one
        // side empty
        let mut dv = Vec::new();
        for l in [0u32, 0, 1, 1].iter() {
            dv.push(Data::new_training_data(vec![1.0], *l));
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        match tree.fit(&dv) {
            Err(CartError::NoValidSplit) => {}
            _ => panic!("expected a NoValidSplit error"),
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn leaf_min_rejects_small_partitions() {
        use crate::decision_tree::{Data, DecisionTree};

        let features: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0];
        let labels: Vec<u32> = vec![0, 1, 1, 1];
        let mut dv = Vec::new();
        for (f, l) in features.iter().zip(labels.iter()) {
            dv.push(Data::new_training_data(vec![*f], *l));
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.set_leaf_min(2);

        // the perfect candidate at threshold 2 leaves one sample on the left
        // and is skipped
        let subset: Vec<usize> = (0..dv.len()).collect();
        let split = tree.search_split(&dv, &subset).unwrap();
        assert_eq!(split.feature_index, 0);
        assert_eq!(split.threshold, 3.0);
        assert_eq!(split.impurity, 0.25);
    }

    #[test]
    fn node_min_stops_recursion() {
        use crate::decision_tree::{Data, DecisionTree, TreeNode};

        let features: Vec<f32> = vec![1.0, 2.0, 3.0, 4.0];
        let labels: Vec<u32> = vec![0, 0, 1, 0];
        let mut dv = Vec::new();
        for (f, l) in features.iter().zip(labels.iter()) {
            dv.push(Data::new_training_data(vec![*f], *l));
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.set_max_depth(5);
        tree.set_node_min(3);
        tree.set_leaf_min(1);
        tree.fit(&dv).unwrap();

        // the impure right side holds two samples, below node_min, and stays
        // a leaf
        assert_eq!(tree.len(), 3);
        match tree.root().unwrap() {
            TreeNode::Internal {
                threshold, right, ..
            } => {
                assert_eq!(*threshold, 3.0);
                match &**right {
                    TreeNode::Leaf { probabilities } => {
                        assert_eq!(probabilities.len(), 2);
                        assert_eq!(probabilities[&0], 0.5);
                        assert_eq!(probabilities[&1], 0.5);
                    }
                    _ => panic!("expected a leaf on the right side"),
                }
            }
            _ => panic!("expected an internal root"),
        }
    }

    #[test]
    fn depth_bound_holds() {
        use crate::decision_tree::{Data, DecisionTree};

        let mut dv = Vec::new();
        for i in 0..16 {
            dv.push(Data::new_training_data(vec![(i + 1) as f32], (i % 2) as u32));
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.set_max_depth(3);
        tree.set_leaf_min(1);
        tree.fit(&dv).unwrap();

        assert!(max_internal_depth(tree.root().unwrap()) <= 3);
    }

    #[test]
    fn splits_until_pure_without_limits() {
        use crate::decision_tree::{Data, DecisionTree};

        fn all_leaves_pure(node: &TreeNode) -> bool {
            match node {
                TreeNode::Leaf { probabilities } => probabilities.len() == 1,
                TreeNode::Internal { left, right, .. } => {
                    all_leaves_pure(left) && all_leaves_pure(right)
                }
            }
        }

        // with a generous depth limit and permissive minimums, every leaf
        // must end up pure
        let mut dv = Vec::new();
        for i in 0..16 {
            dv.push(Data::new_training_data(vec![(i + 1) as f32], (i % 2) as u32));
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.set_max_depth(16);
        tree.set_node_min(2);
        tree.set_leaf_min(1);
        tree.fit(&dv).unwrap();

        assert!(all_leaves_pure(tree.root().unwrap()));
    }

    #[test]
    fn leaf_probabilities_are_normalized() {
        use crate::decision_tree::{Data, DecisionTree};

        let mut dv = Vec::new();
        for i in 0..16 {
            dv.push(Data::new_training_data(vec![(i + 1) as f32], (i % 2) as u32));
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.set_max_depth(3);
        tree.set_leaf_min(1);
        tree.fit(&dv).unwrap();

        for probabilities in tree.predict(&dv).unwrap() {
            let mut sum: f64 = 0.0;
            for p in probabilities.values() {
                assert!(*p >= 0.0);
                assert!(*p <= 1.0);
                sum += *p;
            }
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn short_feature_vector_is_an_error() {
        use crate::decision_tree::{Data, DecisionTree};
        use crate::errors::CartError;

        let features: Vec<f32> = vec![1.0, 2.0, 10.0, 11.0];
        let labels: Vec<u32> = vec![0, 0, 1, 1];
        let mut dv = Vec::new();
        for (f, l) in features.iter().zip(labels.iter()) {
            dv.push(Data::new_training_data(vec![*f], *l));
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.set_leaf_min(1);
        tree.fit(&dv).unwrap();

        match tree.predict_single(&[]) {
            Err(CartError::IndexOutOfRange(_, _)) => {}
            _ => panic!("expected an IndexOutOfRange error"),
        }
    }

    #[test]
    fn predict_before_fit_is_an_error() {
        use crate::decision_tree::DecisionTree;
        use crate::errors::CartError;

        let tree = DecisionTree::new();
        match tree.predict_single(&[1.0]) {
            Err(CartError::InvalidArgument(_)) => {}
            _ => panic!("expected an InvalidArgument error"),
        }
    }

    #[test]
    fn invalid_hyperparameters() {
        use crate::decision_tree::{Data, DecisionTree};
        use crate::errors::CartError;

        let dv = vec![
            Data::new_training_data(vec![1.0], 0),
            Data::new_training_data(vec![2.0], 1),
        ];

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.set_max_depth(0);
        match tree.fit(&dv) {
            Err(CartError::InvalidArgument(_)) => {}
            _ => panic!("expected an InvalidArgument error"),
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(1);
        tree.set_leaf_min(0);
        match tree.fit(&dv) {
            Err(CartError::InvalidArgument(_)) => {}
            _ => panic!("expected an InvalidArgument error"),
        }

        let mut tree = DecisionTree::new();
        tree.set_feature_size(2);
        match tree.fit(&dv) {
            Err(CartError::InvalidArgument(_)) => {}
            _ => panic!("expected an InvalidArgument error"),
        }
    }

    #[test]
    fn config_express() {
        use crate::config::Config;
        use crate::decision_tree::{Data, DecisionTree};

        let mut c = Config::new();
        c.set_feature_size(1);
        c.set_max_depth(5);
        c.set_node_min(2);
        c.set_leaf_min(1);
        assert!(c.to_string().contains("maximum depth = 5"));

        let dv = vec![
            Data::new_training_data(vec![1.0], 0),
            Data::new_training_data(vec![2.0], 1),
        ];
        let mut tree = DecisionTree::from_config(&c);
        tree.fit(&dv).unwrap();
        assert_eq!(tree.len(), 3);
    }

    #[test]
    #[cfg(feature = "input")]
    fn infer_iris_format() {
        use crate::input::infer;

        let fmt = infer("dataset/iris/train.txt");
        assert_eq!(fmt.delimeter, ',');
        assert_eq!(fmt.header, false);
    }

    #[test]
    #[cfg(feature = "input")]
    fn test_iris() {
        use crate::config::Config;
        use crate::decision_tree::{DataVec, DecisionTree};
        use crate::fitness::accuracy;
        use crate::input::{self, InputFormat};

        let mut cfg = Config::new();
        cfg.set_feature_size(4);
        cfg.set_max_depth(3);

        let mut input_format = InputFormat::csv_format();
        input_format.set_label_index(4);
        let train_dv: DataVec =
            input::load("dataset/iris/train.txt", input_format).expect("failed to load training data");
        assert_eq!(train_dv.len(), 30);

        let mut tree = DecisionTree::from_config(&cfg);
        tree.fit(&train_dv).unwrap();

        let predicted = tree.predict(&train_dv).unwrap();
        assert_eq!(predicted.len(), train_dv.len());
        assert!(accuracy(&train_dv, &predicted) > 0.99);
    }
}

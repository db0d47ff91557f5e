extern crate cart;

use cart::config::Config;
use cart::decision_tree::{DataVec, DecisionTree};
use cart::fitness::{accuracy, most_likely};
use cart::input::{self, InputFormat};

fn main() {
    let mut cfg = Config::new();
    cfg.set_feature_size(4);
    cfg.set_max_depth(3);
    cfg.set_node_min(2);
    cfg.set_leaf_min(1);

    // load data
    let train_file = "dataset/iris/train.txt";
    let test_file = "dataset/iris/test.txt";

    let mut input_format = InputFormat::csv_format();
    input_format.set_label_index(4);
    let train_dv: DataVec =
        input::load(train_file, input_format).expect("failed to load training data");
    let test_dv: DataVec = input::load(test_file, input_format).expect("failed to load test data");

    // train the decision tree
    let mut tree = DecisionTree::from_config(&cfg);
    tree.fit(&train_dv).expect("failed to train the decision tree");
    tree.print();

    // inference the test data
    let predicted = tree.predict(&test_dv).expect("failed to predict");

    assert_eq!(predicted.len(), test_dv.len());
    let mut correct = 0;
    let mut wrong = 0;
    for (i, (data, probabilities)) in test_dv.iter().zip(predicted.iter()).enumerate() {
        if most_likely(probabilities) == Some(data.label) {
            correct += 1;
        } else {
            wrong += 1;
        };
        println!("[{}]  {}  {:?}", i, data.label, most_likely(probabilities));
    }

    println!("correct: {}", correct);
    println!("wrong:   {}", wrong);
    println!("accuracy: {}", accuracy(&test_dv, &predicted));
}

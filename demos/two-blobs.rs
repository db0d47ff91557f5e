extern crate cart;

use cart::decision_tree::{Data, DataVec, DecisionTree};
use cart::fitness::most_likely;

fn main() {
    // two linearly separated blobs on a diagonal
    let mut dv: DataVec = Vec::new();
    for i in 0..10 {
        let x = i as f32;
        let label = if i < 5 { 0 } else { 1 };
        dv.push(Data::new_training_data(vec![x, 10.0 - x], label));
    }

    let mut tree = DecisionTree::new();
    tree.set_feature_size(2);
    tree.set_max_depth(3);
    tree.fit(&dv).expect("failed to train the decision tree");
    tree.print();

    let probabilities = tree
        .predict_single(&[1.5, 8.5])
        .expect("failed to predict");
    println!("probabilities: {:?}", probabilities);
    println!("predicted class: {:?}", most_likely(probabilities));
}

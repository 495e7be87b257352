pub mod node_combination_iterator;

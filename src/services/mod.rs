pub mod diff_classifier;
pub mod selection_observer;
pub mod simulator;

pub use diff_classifier::DiffClassifier;
pub use selection_observer::SelectionObserver;
pub use simulator::Simulator;

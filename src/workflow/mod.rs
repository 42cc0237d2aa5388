pub mod batch_predictor;

pub use batch_predictor::BatchPredictor;

// Startup wiring - loads every artifact into an immutable context
pub mod bootstrap;

// Historical dataset loading and column statistics
pub mod dataset;

// Client identifier encoding
pub mod encoder;

// Hybrid decision engine
pub mod ensemble;

// Retrieval-augmented explanation
pub mod explainer;

// Forecast / what-if / ask orchestration
pub mod forecaster;

// Persisted min-max feature scaler
pub mod scaler;

// Synthetic forecast input generation
pub mod scenario;

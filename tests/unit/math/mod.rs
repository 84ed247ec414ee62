pub mod weighting;

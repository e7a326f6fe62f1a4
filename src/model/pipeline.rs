// src/model/pipeline.rs
use log::debug;
use ndarray::{Array1, Array2, ArrayView2};

use super::standardizer::Standardizer;
use super::svm::{LinearModel, MarginClassifier, MarginParams};
use crate::error::{ClassifyError, ClassifyResult};

/// Standardizer followed by the margin classifier, fitted together.
///
/// Callers only ever see raw feature coordinates; standardization happens
/// inside with the statistics of the training rows.
#[derive(Debug, Clone)]
pub struct Pipeline {
    params: MarginParams,
    fitted: Option<FittedPipeline>,
}

#[derive(Debug, Clone)]
pub struct FittedPipeline {
    pub standardizer: Standardizer,
    pub classifier: MarginClassifier,
}

impl Pipeline {
    pub fn new(params: MarginParams) -> Self {
        Self {
            params,
            fitted: None,
        }
    }

    /// Fits the standardizer, then the classifier on standardized rows. The
    /// previous fitted state, if any, is only replaced once both succeed.
    pub fn fit(&mut self, x: ArrayView2<f64>, targets: &[usize]) -> ClassifyResult<()> {
        let mut standardizer = Standardizer::new();
        standardizer.fit(x)?;
        let z = standardizer.transform(x)?;
        debug!("Standardized {} training rows", z.nrows());

        let mut classifier = MarginClassifier::new(self.params);
        classifier.fit(z.view(), targets)?;

        self.fitted = Some(FittedPipeline {
            standardizer,
            classifier,
        });
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    pub fn fitted(&self) -> Option<&FittedPipeline> {
        self.fitted.as_ref()
    }

    /// Classifier parameters in standardized space.
    pub fn model(&self) -> Option<&LinearModel> {
        self.fitted.as_ref().and_then(|f| f.classifier.model())
    }

    pub fn decision_function(&self, x: ArrayView2<f64>) -> ClassifyResult<Array1<f64>> {
        let fitted = self.fitted.as_ref().ok_or(ClassifyError::NotFitted)?;
        let z = fitted.standardizer.transform(x)?;
        fitted.classifier.decision_function(z.view())
    }

    pub fn predict_proba(&self, x: ArrayView2<f64>) -> ClassifyResult<Array2<f64>> {
        let fitted = self.fitted.as_ref().ok_or(ClassifyError::NotFitted)?;
        let z = fitted.standardizer.transform(x)?;
        fitted.classifier.predict_proba(z.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Two clusters mirrored around (50, 5) on very different scales.
    fn raw_training() -> (Array2<f64>, Vec<usize>) {
        let x = array![
            [40.0, 4.0],
            [38.0, 3.5],
            [42.0, 3.0],
            [39.0, 4.2],
            [60.0, 6.0],
            [62.0, 6.5],
            [58.0, 7.0],
            [61.0, 5.8]
        ];
        (x, vec![0, 0, 0, 0, 1, 1, 1, 1])
    }

    #[test]
    fn test_unfitted_pipeline_errors() {
        let pipeline = Pipeline::new(MarginParams::default());
        assert!(!pipeline.is_fitted());
        assert!(matches!(
            pipeline.decision_function(array![[1.0, 2.0]].view()),
            Err(ClassifyError::NotFitted)
        ));
        assert!(matches!(
            pipeline.predict_proba(array![[1.0, 2.0]].view()),
            Err(ClassifyError::NotFitted)
        ));
    }

    #[test]
    fn test_failed_fit_keeps_previous_state() {
        let (x, y) = raw_training();
        let mut pipeline = Pipeline::new(MarginParams::default());
        pipeline.fit(x.view(), &y).unwrap();
        let probe = array![[45.0, 5.0]];
        let before = pipeline.decision_function(probe.view()).unwrap();

        let err = pipeline.fit(x.view(), &[0; 8]).unwrap_err();
        assert!(matches!(err, ClassifyError::DegenerateTrainingSet { .. }));
        assert_eq!(pipeline.decision_function(probe.view()).unwrap(), before);
    }

    #[test]
    fn test_raw_inputs_are_classified() {
        let (x, y) = raw_training();
        let mut pipeline = Pipeline::new(MarginParams::default());
        pipeline.fit(x.view(), &y).unwrap();

        let decisions = pipeline.decision_function(x.view()).unwrap();
        for (&f, &t) in decisions.iter().zip(&y) {
            assert_eq!(usize::from(f > 0.0), t);
        }

        let midpoint = array![[50.0, 5.0]];
        let centroid = array![[60.25, 6.325]];
        let at_mid = pipeline.decision_function(midpoint.view()).unwrap()[0];
        let at_centroid = pipeline.decision_function(centroid.view()).unwrap()[0];
        assert!(at_mid.abs() < 0.1 * at_centroid.abs());
    }

    #[test]
    fn test_repeated_fit_is_deterministic() {
        let (x, y) = raw_training();
        let held_out = array![[47.0, 5.5], [55.0, 4.0], [30.0, 9.0]];

        let mut first = Pipeline::new(MarginParams::default());
        first.fit(x.view(), &y).unwrap();
        let mut second = Pipeline::new(MarginParams::default());
        second.fit(x.view(), &y).unwrap();

        assert_eq!(
            first.decision_function(held_out.view()).unwrap(),
            second.decision_function(held_out.view()).unwrap()
        );
        assert_eq!(
            first.predict_proba(held_out.view()).unwrap(),
            first.predict_proba(held_out.view()).unwrap()
        );
    }
}

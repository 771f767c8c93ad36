//! Property-based checks of the prediction path.

use oncoserve::{
    ClassifierParameters, FEATURE_NAMES, FeatureVector, InferencePipeline, PipelineState,
    ScalingParameters,
};
use proptest::prelude::*;

fn fitted_pipeline(mean: Vec<f64>, scale: Vec<f64>, coef: Vec<f64>, intercept: f64) -> InferencePipeline {
    let scaler = ScalingParameters {
        mean,
        scale,
        feature_names: None,
    };
    let mut classifier = ClassifierParameters::constant(intercept);
    classifier.coefficients = coef;
    InferencePipeline::new(PipelineState::ready(scaler, classifier).expect("valid params"))
}

fn values_strategy() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(-1_000.0f64..1_000.0, FEATURE_NAMES.len())
}

fn scale_strategy() -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec(prop_oneof![Just(0.0f64), 0.01f64..100.0], FEATURE_NAMES.len())
}

/// Render a JSON object whose keys appear in the given order.
fn object_text(order: &[usize], values: &[f64]) -> String {
    let fields: Vec<String> = order
        .iter()
        .map(|&idx| format!("\"{}\":{:?}", FEATURE_NAMES[idx], values[idx]))
        .collect();
    format!("{{{}}}", fields.join(","))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prediction_is_deterministic(
        values in values_strategy(),
        mean in values_strategy(),
        scale in scale_strategy(),
        coef in values_strategy(),
        intercept in -10.0f64..10.0,
    ) {
        let pipeline = fitted_pipeline(mean, scale, coef, intercept);
        let vector = FeatureVector::from_named(
            FEATURE_NAMES.iter().copied().zip(values.iter().copied()),
        ).unwrap();
        let first = pipeline.predict_vector(&vector).unwrap();
        let second = pipeline.clone().predict_vector(&vector).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn key_order_does_not_change_the_result(
        values in values_strategy(),
        coef in values_strategy(),
        order in Just((0..FEATURE_NAMES.len()).collect::<Vec<_>>()).prop_shuffle(),
    ) {
        let pipeline = fitted_pipeline(
            vec![0.0; FEATURE_NAMES.len()],
            vec![1.0; FEATURE_NAMES.len()],
            coef,
            0.0,
        );
        let canonical: Vec<usize> = (0..FEATURE_NAMES.len()).collect();
        let in_order: serde_json::Value =
            serde_json::from_str(&object_text(&canonical, &values)).unwrap();
        let shuffled: serde_json::Value =
            serde_json::from_str(&object_text(&order, &values)).unwrap();
        let a = pipeline.predict(&in_order).unwrap();
        let b = pipeline.predict(&shuffled).unwrap();
        prop_assert_eq!(a, b);

        let pairs: Vec<(&str, f64)> = order.iter().map(|&i| (FEATURE_NAMES[i], values[i])).collect();
        let from_pairs = pipeline.predict_vector(&FeatureVector::from_named(pairs).unwrap()).unwrap();
        prop_assert_eq!(a, from_pairs);
    }

    #[test]
    fn complete_numeric_input_never_fails_validation(values in values_strategy()) {
        let pipeline = fitted_pipeline(
            vec![0.0; FEATURE_NAMES.len()],
            vec![1.0; FEATURE_NAMES.len()],
            vec![0.0; FEATURE_NAMES.len()],
            1.0,
        );
        let canonical: Vec<usize> = (0..FEATURE_NAMES.len()).collect();
        let payload: serde_json::Value =
            serde_json::from_str(&object_text(&canonical, &values)).unwrap();
        prop_assert_eq!(pipeline.predict(&payload).unwrap().label(), "Malignant");
    }
}

use spectone::core::cross::{analyze_cross, CrossAnalysisRequest};
use spectone::error::AnalysisError;

#[test]
fn shared_frequency_tops_the_cross_ranking() {
    let fs = 10.0;
    let n = 500;
    let s1: Vec<f64> = (0..n)
        .map(|i| (std::f64::consts::TAU * 0.5 * i as f64 / fs).sin())
        .collect();
    let s2: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 / fs;
            0.8 * (std::f64::consts::TAU * 0.5 * t).sin()
                + (std::f64::consts::TAU * 2.3 * t).sin() * 0.1
        })
        .collect();

    let result = analyze_cross(&CrossAnalysisRequest::new(s1, s2, fs)).unwrap();
    assert!((result.components[0].frequency - 0.5).abs() < 0.02);
    assert!(result.components[0].cross_power_normalized > 0.9);
}

#[test]
fn mismatched_lengths_are_rejected() {
    let err = analyze_cross(&CrossAnalysisRequest::new(
        vec![0.0; 100],
        vec![0.0; 99],
        1.0,
    ))
    .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidParameter(_)));
}

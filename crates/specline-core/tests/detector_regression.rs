use specline_core::detect_lines;

fn gaussian_dip_spectrum(
    n_pix: usize,
    lo: f64,
    hi: f64,
    center: f64,
    depth: f64,
    sigma: f64,
) -> (Vec<f64>, Vec<f64>) {
    let step = (hi - lo) / (n_pix - 1) as f64;
    let wavelength: Vec<f64> = (0..n_pix).map(|i| lo + step * i as f64).collect();
    let flux: Vec<f64> = wavelength
        .iter()
        .map(|&wl| {
            let z = (wl - center) / sigma;
            1.0 - depth * (-0.5 * z * z).exp()
        })
        .collect();
    (wavelength, flux)
}

#[test]
fn reference_scenario_recovers_the_single_line() {
    // 10,000 evenly spaced samples over [5000, 5100] with one Gaussian dip of
    // depth 0.3 and sigma 0.3 at 5050.
    let (wavelength, flux) = gaussian_dip_spectrum(10_000, 5000.0, 5100.0, 5050.0, 0.3, 0.3);

    let detection = detect_lines(&wavelength, &flux, 0.1).expect("detection should succeed");

    assert_eq!(detection.len(), 1, "exactly one line should be detected");
    assert!(
        (detection.centers[0] - 5050.0).abs() <= 0.1,
        "detected center {} should fall within 0.1 of 5050",
        detection.centers[0]
    );
    assert!(
        (detection.sigma_widths[0] - 0.3).abs() <= 0.06,
        "detected sigma {} should fall within 20% of 0.3",
        detection.sigma_widths[0]
    );
    assert!(
        (detection.prominences[0] - 0.3).abs() <= 0.02,
        "detected prominence {} should approximate the dip depth",
        detection.prominences[0]
    );
}

#[test]
fn raising_the_threshold_empties_the_detection() {
    let (wavelength, flux) = gaussian_dip_spectrum(10_000, 5000.0, 5100.0, 5050.0, 0.3, 0.3);

    let detection = detect_lines(&wavelength, &flux, 0.5).expect("detection should succeed");
    assert!(
        detection.is_empty(),
        "a threshold above every prominence must yield a zero-line result"
    );
}

#[test]
fn lowering_the_threshold_never_drops_lines() {
    let (wavelength, mut flux) = gaussian_dip_spectrum(10_000, 5000.0, 5100.0, 5050.0, 0.3, 0.3);
    // Add a second, shallower dip.
    for (value, &wl) in flux.iter_mut().zip(&wavelength) {
        let z: f64 = (wl - 5080.0) / 0.4;
        *value -= 0.08 * (-0.5 * z * z).exp();
    }

    let strict = detect_lines(&wavelength, &flux, 0.1).expect("strict detection");
    let loose = detect_lines(&wavelength, &flux, 0.03).expect("loose detection");

    assert_eq!(strict.len(), 1);
    assert_eq!(loose.len(), 2);
    for center in &strict.centers {
        assert!(
            loose
                .centers
                .iter()
                .any(|candidate| (candidate - center).abs() <= 1.0e-9),
            "line at {center} disappeared when the threshold was lowered"
        );
    }
}

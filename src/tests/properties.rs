#[cfg(test)]
mod property_tests {
    use crate::{
        dithering::{
            DitheringType, error_diffusion::ErrorDiffusionType, threshold::void_and_cluster,
        },
        dither_with_rng,
        registry::{lookup, strategies},
        tests::utils::{
            TEST_IMAGE_SIZE, default_params, gradient_buffer, random_buffer, seeded, uniform_gray,
        },
        texture::PixelBuffer,
    };

    /// Output does not depend on the random source.
    const DETERMINISTIC: [&str; 14] = [
        "Atkinson",
        "Floyd-Steinberg",
        "AM Halftoning",
        "Checkerboard",
        "Jarvis-Judice-Ninke",
        "Bayer Matrix",
        "Clustered Dot Ordered",
        "Stucki",
        "Sierra-3",
        "Sierra-2",
        "Sierra Lite",
        "Gradient-based",
        "Dispersed Dot Ordered",
        "Lattice-Boltzmann",
    ];

    const RANDOMIZED: [&str; 7] = [
        "FM Halftoning",
        "Dot Diffusion",
        "Additive Noise",
        "White Noise",
        "Stochastic Screening",
        "Electrostatic Halftoning",
        "Void-and-Cluster",
    ];

    fn run(name: &str, buffer: &PixelBuffer, seed: u64) -> PixelBuffer {
        let strategy = lookup(name).unwrap();
        let mut out = buffer.clone();
        dither_with_rng(&mut out, name, &default_params(strategy), &mut seeded(seed)).unwrap();
        out
    }

    fn assert_opaque_gray(buffer: &PixelBuffer, name: &str) {
        for px in buffer.as_ref() {
            assert_eq!(px.a, 255, "{name}: alpha");
            assert!(px.is_gray(), "{name}: channels differ in {px:?}");
        }
    }

    #[test]
    fn test_registry_is_split_between_fixtures() {
        assert_eq!(DETERMINISTIC.len() + RANDOMIZED.len(), strategies().len());
        for strategy in strategies() {
            assert!(
                DETERMINISTIC.contains(&strategy.name) || RANDOMIZED.contains(&strategy.name),
                "{}",
                strategy.name
            );
        }
    }

    #[test]
    fn test_every_algorithm_keeps_dimensions_and_writes_opaque_gray() {
        let input = gradient_buffer(TEST_IMAGE_SIZE, TEST_IMAGE_SIZE - 5);
        for strategy in strategies() {
            let out = run(strategy.name, &input, 11);
            assert_eq!(out.shape(), input.shape(), "{}", strategy.name);
            assert_opaque_gray(&out, strategy.name);
        }
    }

    #[test]
    fn test_every_algorithm_survives_scaling() {
        let input = random_buffer(TEST_IMAGE_SIZE + 1, TEST_IMAGE_SIZE - 3, 5);
        for strategy in strategies() {
            let params = default_params(strategy).with("scale", 0.3);
            let mut out = input.clone();
            dither_with_rng(&mut out, strategy.name, &params, &mut seeded(2)).unwrap();
            assert_eq!(out.shape(), input.shape(), "{}", strategy.name);
            assert_opaque_gray(&out, strategy.name);
        }
    }

    #[test]
    fn test_error_diffusion_is_binary_at_two_levels() {
        let input = random_buffer(TEST_IMAGE_SIZE, TEST_IMAGE_SIZE, 99);
        let diffusers = strategies()
            .iter()
            .filter(|s| matches!(s.kind, DitheringType::ErrorDiffusion(_)));
        for strategy in diffusers {
            for serpentine in [false, true] {
                let mut params = default_params(strategy);
                if params.contains("serpentineProcessing") {
                    params.set("serpentineProcessing", serpentine);
                }
                let mut out = input.clone();
                dither_with_rng(&mut out, strategy.name, &params, &mut seeded(1)).unwrap();
                for px in out.as_ref() {
                    assert!(px.r == 0 || px.r == 255, "{}: {px:?}", strategy.name);
                    assert!(px.is_gray());
                }
            }
        }
    }

    #[test]
    fn test_deterministic_algorithms_ignore_the_seed() {
        // the shared matrix is built before comparing outputs
        void_and_cluster::shared_matrix(0.5, &mut seeded(0));
        let input = gradient_buffer(TEST_IMAGE_SIZE, TEST_IMAGE_SIZE);
        for name in DETERMINISTIC.iter().chain(&["Void-and-Cluster"]) {
            assert_eq!(run(name, &input, 1), run(name, &input, 2), "{name}");
        }
    }

    #[test]
    fn test_randomized_algorithms_repeat_under_equal_seed() {
        let input = random_buffer(TEST_IMAGE_SIZE, TEST_IMAGE_SIZE, 3);
        for name in RANDOMIZED {
            assert_eq!(run(name, &input, 42), run(name, &input, 42), "{name}");
        }
    }

    #[test]
    fn test_void_and_cluster_matrix_is_built_once() {
        let input = gradient_buffer(8, 8);
        run("Void-and-Cluster", &input, 7);
        let first = void_and_cluster::shared_matrix(0.0, &mut seeded(100));
        run("Void-and-Cluster", &input, 8);
        let second = void_and_cluster::shared_matrix(1.0, &mut seeded(200));
        assert!(std::ptr::eq(first, second));
        assert!(first.is_permutation());
        assert_eq!(first.side(), void_and_cluster::MATRIX_SIDE);
    }

    #[test]
    fn test_serpentine_fixture_through_the_registry() {
        let strategy = lookup("Floyd-Steinberg").unwrap();
        assert_eq!(
            strategy.kind,
            DitheringType::ErrorDiffusion(ErrorDiffusionType::FloydSteinberg)
        );
        let params = default_params(strategy).with("serpentineProcessing", true);
        let mut buffer = uniform_gray(3, 3, 200);
        dither_with_rng(&mut buffer, strategy.name, &params, &mut seeded(0)).unwrap();
        let values: Vec<u8> = buffer.as_ref().iter().map(|px| px.r).collect();
        assert_eq!(values, vec![255, 255, 255, 255, 0, 255, 255, 255, 255]);
    }

    #[test]
    fn test_flat_extremes_stay_flat() {
        let names = ["Floyd-Steinberg", "Bayer Matrix", "Sierra-3", "Lattice-Boltzmann"];
        for name in names {
            let white = run(name, &uniform_gray(6, 6, 255), 0);
            assert!(white.as_ref().iter().all(|px| px.r == 255), "{name}");
            let black = run(name, &uniform_gray(6, 6, 0), 0);
            assert!(black.as_ref().iter().all(|px| px.r == 0), "{name}");
        }
    }
}

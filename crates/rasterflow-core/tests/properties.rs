//! Property-based tests for kernels, operators, and graph invariants.
//!
//! Uses proptest to check that kernels are normalized for every radius and
//! angle, that identity settings leave pixels untouched, and that randomly
//! built graphs stay acyclic and evaluate each node at most once.

use proptest::prelude::*;
use rasterflow_core::operators::{Blur, BlurMode, BrightnessContrast};
use rasterflow_core::{
    GraphError, ImageGraph, Kernel, MAX_RADIUS, MIN_RADIUS, NodeId, Operator, OperatorKind,
    PixelBuffer, PortValue, convolve,
};

fn image_strategy() -> impl Strategy<Value = PixelBuffer> {
    (1u32..12, 1u32..12).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h * 3) as usize)
            .prop_map(move |data| PixelBuffer::from_raw(w, h, data).unwrap())
    })
}

fn run(op: &mut dyn Operator, img: &PixelBuffer) -> Option<PixelBuffer> {
    let input = PortValue::Image(img.clone());
    let mut outputs = [None];
    op.process(&[Some(&input)], &mut outputs).unwrap();
    match outputs[0].take() {
        Some(PortValue::Image(out)) => Some(out),
        _ => None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Uniform kernels are symmetric about both axes and sum to 1.
    #[test]
    fn uniform_kernel_normalized_and_symmetric(radius in MIN_RADIUS..=MAX_RADIUS) {
        let k = Kernel::uniform(radius);
        let n = k.size();
        prop_assert_eq!(n, 2 * radius as usize + 1);
        prop_assert!((k.sum() - 1.0).abs() < 1e-4, "sum = {}", k.sum());
        for r in 0..n {
            for c in 0..n {
                let v = k.get(r, c);
                prop_assert!(v > 0.0);
                prop_assert!((v - k.get(c, r)).abs() < 1e-6);
                prop_assert!((v - k.get(n - 1 - r, c)).abs() < 1e-6);
            }
        }
    }

    /// Directional kernels are non-negative, hit the centre, and sum to 1.
    #[test]
    fn directional_kernel_normalized(radius in MIN_RADIUS..=MAX_RADIUS, angle in 0.0f32..360.0) {
        let k = Kernel::directional(radius, angle);
        let c = k.radius();
        prop_assert!((k.sum() - 1.0).abs() < 1e-4, "sum = {}", k.sum());
        prop_assert!(k.weights().iter().all(|&w| w >= 0.0));
        prop_assert!(k.get(c, c) > 0.0);
        // A line of 2r+1 samples touches at most 2r+1 cells.
        let touched = k.weights().iter().filter(|&&w| w > 0.0).count();
        prop_assert!(touched <= k.size());
    }

    /// Brightness 0 / contrast 1 is the identity for any image.
    #[test]
    fn neutral_brightness_contrast_is_identity(img in image_strategy()) {
        let mut op = BrightnessContrast::new();
        prop_assert_eq!(run(&mut op, &img), Some(img));
    }

    /// Brightness/contrast output always equals the clamped affine map.
    #[test]
    fn brightness_contrast_matches_formula(
        img in image_strategy(),
        brightness in -100i32..=100,
        contrast in 0.0f32..=3.0,
    ) {
        let mut op = BrightnessContrast::new();
        op.set_brightness(brightness);
        op.set_contrast(contrast);
        let out = run(&mut op, &img).unwrap();
        for (&i, &o) in img.as_bytes().iter().zip(out.as_bytes()) {
            let expected = (f32::from(i) * contrast + brightness as f32).round().clamp(0.0, 255.0);
            prop_assert!((f32::from(o) - expected).abs() <= 1.0);
        }
    }

    /// Blur with amount 0 returns the input; amount 1 returns the convolution.
    #[test]
    fn blur_amount_endpoints(
        img in image_strategy(),
        radius in MIN_RADIUS..=6,
        directional in any::<bool>(),
        angle in 0.0f32..360.0,
    ) {
        let mut op = Blur::new();
        op.set_radius(radius);
        op.set_mode(if directional { BlurMode::Directional } else { BlurMode::Uniform });
        op.set_angle(angle);

        let full = run(&mut op, &img).unwrap();
        prop_assert_eq!(&full, &convolve(&img, op.kernel()));

        op.set_amount(0.0);
        prop_assert_eq!(run(&mut op, &img), Some(img));
    }

    /// Convolving a flat image with any kernel leaves it flat.
    #[test]
    fn flat_image_survives_convolution(
        rgb in any::<[u8; 3]>(),
        radius in MIN_RADIUS..=5,
        angle in 0.0f32..360.0,
    ) {
        let img = PixelBuffer::filled(7, 5, rgb);
        prop_assert_eq!(&convolve(&img, &Kernel::uniform(radius)), &img);
        prop_assert_eq!(&convolve(&img, &Kernel::directional(radius, angle)), &img);
    }

    /// Random connection attempts never produce a cycle, and every rejected
    /// attempt leaves the connection count unchanged.
    #[test]
    fn random_edges_stay_acyclic(edges in prop::collection::vec((0usize..8, 0usize..8), 0..40)) {
        let mut g = ImageGraph::new();
        let ids: Vec<NodeId> = (0..8).map(|_| g.add_node(OperatorKind::Blur)).collect();

        for (a, b) in edges {
            let before = g.connection_count();
            match g.connect(ids[a], 0, ids[b], 0) {
                Ok(()) => prop_assert_eq!(g.connection_count(), before + 1),
                Err(GraphError::CycleDetected { .. } | GraphError::IncompatibleConnection(_)) => {
                    prop_assert_eq!(g.connection_count(), before);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }

        for &a in &ids {
            for &b in g.downstream(a) {
                prop_assert!(!g.can_reach(b, a), "{a} -> {b} closes a cycle");
            }
        }
    }

    /// In a random tree fed by one source, evaluating every sink runs each node
    /// exactly once and leaves every node clean.
    #[test]
    fn random_tree_evaluates_each_node_once(
        parents in prop::collection::vec((any::<prop::sample::Index>(), any::<bool>()), 1..16),
    ) {
        let mut g = ImageGraph::new();
        let src = g.add_node(OperatorKind::Source);
        g.load_image(src, PixelBuffer::filled(3, 3, [90, 120, 150])).unwrap();

        let mut producers = vec![src];
        for (parent, is_blur) in parents {
            let kind = if is_blur { OperatorKind::Blur } else { OperatorKind::BrightnessContrast };
            let id = g.add_node(kind);
            g.connect(*parent.get(&producers), 0, id, 0).unwrap();
            producers.push(id);
        }

        let mut sinks = Vec::new();
        for &p in &producers {
            if g.downstream(p).is_empty() {
                let sink = g.add_node(OperatorKind::Sink);
                g.connect(p, 0, sink, 0).unwrap();
                sinks.push(sink);
            }
        }

        for &sink in &sinks {
            prop_assert!(g.evaluate(sink).is_ok());
        }
        for id in g.node_ids().collect::<Vec<_>>() {
            prop_assert_eq!(g.process_count(id), 1, "{} ran more than once", id);
            prop_assert!(!g.is_dirty(id));
        }
    }
}

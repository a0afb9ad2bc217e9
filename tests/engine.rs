mod common;

mod tests {
    use tree_light_composer::color::HsvF;
    use tree_light_composer::geometry::{SweepDirection, sweep_depths};
    use tree_light_composer::{
        EffectEngine, EffectId, EffectSlot, EngineConfig, FrameBuffer, Instant, Rgb, Vec3,
    };

    use super::common::{BLACK, RED, RecordingDriver};

    fn tree_frame(positions: &[Vec3]) -> FrameBuffer<RecordingDriver> {
        let mut frame = FrameBuffer::new(RecordingDriver::default());
        frame.resize(positions.len());
        frame.set_mask_all(true);
        for (index, position) in positions.iter().enumerate() {
            frame.set_position(index, *position);
        }
        frame
    }

    fn column(heights: &[f32]) -> Vec<Vec3> {
        heights.iter().map(|z| Vec3::new(0.0, 0.0, *z)).collect()
    }

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn lit(frame: &FrameBuffer<RecordingDriver>) -> Vec<usize> {
        frame
            .colors()
            .iter()
            .enumerate()
            .filter(|(_, color)| **color != BLACK)
            .map(|(index, _)| index)
            .collect()
    }

    #[test]
    fn test_blink_timing() {
        let mut frame = tree_frame(&column(&[0.0, 1.0]));
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::Blink, at(10_000), RED, &mut frame);

        for (elapsed, on) in [
            (0, true),
            (500, true),
            (999, true),
            (1000, false),
            (1500, false),
            (2000, true),
            (3000, false),
        ] {
            engine.tick(at(10_000 + elapsed), RED, &mut frame);
            let expected = if on { [RED, RED] } else { [BLACK, BLACK] };
            assert_eq!(frame.colors(), &expected, "elapsed {elapsed}");
            assert_eq!(frame.driver().last_frame(), Some(&expected[..]));
        }
    }

    #[test]
    fn test_blink_flushes_every_tick() {
        let mut frame = tree_frame(&column(&[0.0]));
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::Blink, at(0), RED, &mut frame);
        let before = frame.driver().frames.len();
        engine.tick(at(10), RED, &mut frame);
        engine.tick(at(20), RED, &mut frame);
        assert_eq!(frame.driver().frames.len(), before + 2);
    }

    #[test]
    fn test_blink_respects_mask() {
        let mut frame = tree_frame(&column(&[0.0, 1.0]));
        frame.set_mask(1, false);
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::Blink, at(0), RED, &mut frame);
        engine.tick(at(0), RED, &mut frame);
        assert_eq!(frame.colors(), &[RED, BLACK]);
    }

    #[test]
    fn test_start_blacks_out_first() {
        let mut frame = tree_frame(&column(&[0.0, 1.0, 2.0]));
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::AllOn, at(0), RED, &mut frame);
        assert_eq!(frame.driver().last_frame(), Some(&[RED; 3][..]));

        let flushed = frame.driver().frames.len();
        engine.start(EffectId::PlaneZ, at(100), RED, &mut frame);
        assert_eq!(frame.driver().frames[flushed], vec![BLACK; 3]);
        assert_eq!(engine.current(), EffectId::PlaneZ);
        assert_eq!(engine.start_time(), at(100));
    }

    #[test]
    fn test_all_on_is_static() {
        let mut frame = tree_frame(&column(&[0.0, 1.0]));
        frame.set_mask(0, false);
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::AllOn, at(0), RED, &mut frame);
        assert_eq!(frame.colors(), &[BLACK, RED]);

        let flushed = frame.driver().frames.len();
        engine.tick(at(5_000), RED, &mut frame);
        assert_eq!(frame.driver().frames.len(), flushed);
        assert!(!engine.is_animating());
    }

    #[test]
    fn test_stop_blacks_out() {
        let mut frame = tree_frame(&column(&[0.0, 1.0]));
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::AllOn, at(0), RED, &mut frame);
        engine.stop(&mut frame);
        assert_eq!(engine.current(), EffectId::None);
        assert_eq!(frame.driver().last_frame(), Some(&[BLACK, BLACK][..]));

        let flushed = frame.driver().frames.len();
        engine.tick(at(1_000), RED, &mut frame);
        assert_eq!(frame.driver().frames.len(), flushed);
    }

    #[test]
    fn test_axis_sweep_passes_and_resets() {
        let mut frame = tree_frame(&column(&[0.0, 1.0, 2.0]));
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::PlaneZ, at(0), RED, &mut frame);
        assert_eq!(engine.slot().depths(), Some(&[0.0, 1.0, 2.0][..]));

        engine.tick(at(0), RED, &mut frame);
        assert_eq!(lit(&frame), vec![0]);
        assert_eq!(frame.pixel(0), Some(RED));

        engine.tick(at(1_000), RED, &mut frame);
        assert_eq!(lit(&frame), vec![1]);

        engine.tick(at(1_500), RED, &mut frame);
        assert!(lit(&frame).is_empty());

        engine.tick(at(1_950), RED, &mut frame);
        assert_eq!(lit(&frame), vec![2]);

        engine.tick(at(2_000), RED, &mut frame);
        assert_eq!(engine.start_time(), at(2_000));
        assert_eq!(engine.slot().depths(), Some(&[0.0, 1.0, 2.0][..]));
        assert_eq!(lit(&frame), vec![0]);
    }

    #[test]
    fn test_axis_sweep_starts_at_lowest_led() {
        let positions = vec![
            Vec3::new(-4.0, 0.0, 0.0),
            Vec3::new(-3.0, 0.0, 0.0),
            Vec3::new(-2.0, 0.0, 0.0),
        ];
        let mut frame = tree_frame(&positions);
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::PlaneX, at(0), RED, &mut frame);
        engine.tick(at(1_000), RED, &mut frame);
        assert_eq!(lit(&frame), vec![1]);
    }

    #[test]
    fn test_axis_sweep_respects_mask() {
        let mut frame = tree_frame(&column(&[0.0, 0.0, 2.0]));
        frame.set_mask(1, false);
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::PlaneZ, at(0), RED, &mut frame);
        engine.tick(at(0), RED, &mut frame);
        assert_eq!(lit(&frame), vec![0]);
    }

    #[test]
    fn test_free_sweep_working_data_is_reproducible() {
        let positions: Vec<Vec3> = (0..20)
            .map(|i| {
                let t = i as f32 * 0.3;
                Vec3::new(t.cos(), t.sin(), t)
            })
            .collect();
        let mut frame = tree_frame(&positions);
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::SweepingPlane, at(4_242), RED, &mut frame);

        let expected = SweepDirection::from_timestamp(4_242);
        let EffectSlot::SweepingPlane(effect) = engine.slot() else {
            panic!("sweeping plane not running");
        };
        assert_eq!(effect.direction(), Some(&expected));
        assert_eq!(effect.depths(), sweep_depths(&positions, &expected).as_slice());
        assert_eq!(effect.color(), HsvF::new(expected.hue, 0.40, 0.20).to_rgb());
    }

    #[test]
    fn test_free_sweep_lights_the_band_in_sweep_color() {
        let positions = column(&[0.0, 0.5, 1.0]);
        let mut frame = tree_frame(&positions);
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::SweepingPlane, at(77), RED, &mut frame);
        engine.tick(at(77), RED, &mut frame);

        let EffectSlot::SweepingPlane(effect) = engine.slot() else {
            panic!("sweeping plane not running");
        };
        let color = effect.color();
        let depths = effect.depths().to_vec();
        for (index, depth) in depths.iter().enumerate() {
            let expected = if depth.abs() < 0.1 { color } else { BLACK };
            assert_eq!(frame.pixel(index), Some(expected), "led {index}");
        }
        assert!(depths.iter().any(|depth| *depth == 0.0));
    }

    #[test]
    fn test_free_sweep_redraws_direction_after_pass() {
        let mut frame = tree_frame(&column(&[0.0, 1.0]));
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::SweepingPlane, at(1_000), RED, &mut frame);

        // Two LEDs one unit apart are never more than one unit deep
        engine.tick(at(1_000 + 1_500), RED, &mut frame);
        assert_eq!(engine.start_time(), at(2_500));
        let EffectSlot::SweepingPlane(effect) = engine.slot() else {
            panic!("sweeping plane not running");
        };
        assert_eq!(
            effect.direction(),
            Some(&SweepDirection::from_timestamp(2_500))
        );
    }

    #[test]
    fn test_restart_recomputes_for_new_layout() {
        let mut frame = tree_frame(&column(&[0.0, 1.0]));
        let mut engine = EffectEngine::new(EngineConfig::default());
        engine.start(EffectId::PlaneZ, at(0), RED, &mut frame);

        frame.resize(3);
        frame.set_mask_all(true);
        for (index, z) in [3.0, 4.0, 5.0].into_iter().enumerate() {
            frame.set_position(index, Vec3::new(0.0, 0.0, z));
        }
        engine.restart(at(50), RED, &mut frame);
        assert_eq!(engine.current(), EffectId::PlaneZ);
        assert_eq!(engine.slot().depths(), Some(&[0.0, 1.0, 2.0][..]));
    }

    #[test]
    fn test_custom_blink_period() {
        let config = EngineConfig {
            blink_half_period: tree_light_composer::Duration::from_millis(250),
            ..EngineConfig::default()
        };
        let mut frame = tree_frame(&column(&[0.0]));
        let mut engine = EffectEngine::new(config);
        engine.start(EffectId::Blink, at(0), Rgb::new(1, 2, 3), &mut frame);
        engine.tick(at(300), Rgb::new(1, 2, 3), &mut frame);
        assert_eq!(frame.colors(), &[BLACK]);
    }
}

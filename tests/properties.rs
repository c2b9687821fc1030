use proptest::prelude::*;
use transact_engine::*;

fn coord() -> impl Strategy<Value = f64> {
    -50.0f64..850.0
}

fn speed() -> impl Strategy<Value = f64> {
    -20.0f64..20.0
}

proptest! {
    #[test]
    fn advance_moves_once_and_flips_only_escaping_axes(
        px in coord(), py in coord(), vx in speed(), vy in speed()
    ) {
        let bounds = Bounds::default();
        let mut body = body_at((px, py), (vx, vy));
        body.advance(&bounds);

        let expected = Vec2::new(px + vx, py + vy);
        prop_assert_eq!(body.position, expected);

        let out_x = expected.x < 0.0 || expected.x > bounds.width;
        let out_y = expected.y < 0.0 || expected.y > bounds.height;
        prop_assert_eq!(body.velocity.x, if out_x { -vx } else { vx });
        prop_assert_eq!(body.velocity.y, if out_y { -vy } else { vy });
    }

    #[test]
    fn offer_weight_counts_confirmations(n in 0usize..40) {
        let mut emitter = Emitter::new(EmitterId(0), body_at((0.0, 0.0), (0.0, 0.0)));
        let mut offer = emitter.emit_offer_wave(OfferId(0));
        for i in 0..n {
            Absorber::new(AbsorberId(i), body_at((0.0, 0.0), (0.0, 0.0))).confirm(&mut offer);
        }
        prop_assert_eq!(offer.weight(), n as f64);
        prop_assert_eq!(offer.confirmations().len(), n);
    }

    #[test]
    fn probabilistic_never_picks_zero_weight(
        seed in any::<u64>(),
        weights in prop::collection::vec(prop_oneof![Just(0.0), 1.0f64..10.0], 1..12)
    ) {
        let mut engine = SelectionEngine::new(SelectionPolicy::Probabilistic, seed);
        match engine.pick(&weights) {
            Some(i) => prop_assert!(weights[i] > 0.0),
            None => prop_assert!(weights.iter().all(|&w| w == 0.0)),
        }
    }

    #[test]
    fn deterministic_picks_first_maximum(
        weights in prop::collection::vec(0u32..10, 1..12)
    ) {
        let as_f64: Vec<f64> = weights.iter().map(|&w| w as f64).collect();
        let mut engine = SelectionEngine::new(SelectionPolicy::Deterministic, 0);
        let max = *weights.iter().max().unwrap();
        let pick = engine.pick(&as_f64);
        if max == 0 {
            prop_assert_eq!(pick, None);
        } else {
            let first = weights.iter().position(|&w| w == max);
            prop_assert_eq!(pick, first);
        }
    }

    #[test]
    fn transactions_never_exceed_selection_cycles(seed in 0u64..500, ticks in 1u64..400) {
        let config = SimConfig::default()
            .with_policy(SelectionPolicy::Probabilistic)
            .with_seed(seed);
        let mut sim = TransactionalSimulation::from_config(config).unwrap();
        for _ in 0..ticks {
            sim.tick_core();
        }
        let cycles = (ticks + 59) / 60;
        prop_assert_eq!(sim.transaction_count(), cycles);
        prop_assert_eq!(sim.log().len() as u64, cycles);
    }
}

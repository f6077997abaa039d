use proptest::prelude::*;

use ledgerdash_primitives::Hash28;
use ledgerdash_transaction::{AssetBundle, AssetName, AssetUnit, Value};

fn arb_unit() -> impl Strategy<Value = AssetUnit> {
    (
        prop::array::uniform28(any::<u8>()),
        prop::collection::vec(any::<u8>(), 0..=32),
    )
        .prop_map(|(policy, name)| AssetUnit::new(Hash28::new(policy), AssetName::new(name).unwrap()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mint_then_burn_nets_to_zero(unit in arb_unit(), quantity in 1i64..=1_000_000) {
        let mut net = AssetBundle::single(unit.clone(), quantity).unwrap();
        net.merge(&AssetBundle::single(unit.clone(), -quantity).unwrap()).unwrap();
        prop_assert!(net.is_empty());

        let minted = Value::lovelace(2_000_000)
            .apply_mint(&AssetBundle::single(unit.clone(), quantity).unwrap())
            .unwrap();
        let burned = minted
            .apply_mint(&AssetBundle::single(unit, -quantity).unwrap())
            .unwrap();
        prop_assert_eq!(burned, Value::lovelace(2_000_000));
    }

    #[test]
    fn unit_text_roundtrip(unit in arb_unit()) {
        let parsed: AssetUnit = unit.to_string().parse().unwrap();
        prop_assert_eq!(parsed, unit);
    }

    #[test]
    fn value_add_sub_inverse(
        a in 0u64..u64::MAX / 2,
        b in 0u64..u64::MAX / 2,
        unit in arb_unit(),
        q in 0u64..1_000,
    ) {
        let x = Value::lovelace(a).with_asset(unit.clone(), q).unwrap();
        let y = Value::lovelace(b);
        let sum = x.checked_add(&y).unwrap();
        prop_assert!(sum.covers(&x));
        prop_assert_eq!(sum.checked_sub(&y).unwrap(), x);
    }
}

use proptest::prelude::*;

use ledgerdash_primitives::Hash28;
use ledgerdash_script::{
    derive_address, payment_credential, script_credential, Address, Credential, Network, OwnerParams, ScriptKind,
    MINT_SPEND, WITHDRAW_PUBLISH,
};

fn arb_hash() -> impl Strategy<Value = Hash28> {
    prop::array::uniform28(any::<u8>()).prop_map(Hash28::new)
}

fn arb_credential() -> impl Strategy<Value = Credential> {
    (any::<bool>(), arb_hash()).prop_map(|(script, hash)| {
        if script {
            Credential::Script(hash)
        } else {
            Credential::Key(hash)
        }
    })
}

fn arb_network() -> impl Strategy<Value = Network> {
    prop_oneof![Just(Network::Mainnet), Just(Network::Preprod), Just(Network::Preview)]
}

fn contract_address(network: Network, owner: Hash28) -> Address {
    let spend = MINT_SPEND.instantiate(ScriptKind::SpendingValidator, &()).unwrap();
    let stake = WITHDRAW_PUBLISH
        .instantiate(ScriptKind::Validator, &OwnerParams { owner })
        .unwrap();
    derive_address(network, script_credential(&spend), Some(script_credential(&stake)))
}

#[test]
fn contract_address_for_known_owner() {
    let owner: Hash28 = "9493315cd92eb5d8c4304e67b7e16ae36d61d34502694657811a2c8e".parse().unwrap();
    assert_eq!(
        contract_address(Network::Preprod, owner).to_string(),
        "addr_test1xqlnscaa54d5cp2v4rxtr305eqj23usvyyrrglsecqn4drnnrzey96uz09nutz7eykvqxwac2yy6z5ede2xrdpwkwtyqgrfam0"
    );
    assert_eq!(
        contract_address(Network::Mainnet, owner).to_string(),
        "addr1xylnscaa54d5cp2v4rxtr305eqj23usvyyrrglsecqn4drnnrzey96uz09nutz7eykvqxwac2yy6z5ede2xrdpwkwtyqt45ahs"
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn derive_address_is_pure(
        network in arb_network(),
        payment in arb_credential(),
        staking in prop::option::of(arb_credential()),
    ) {
        let a = derive_address(network, payment, staking);
        let b = derive_address(network, payment, staking);
        prop_assert_eq!(a, b);
        prop_assert_eq!(payment_credential(&a).unwrap(), payment);

        let parsed: Address = a.to_string().parse().unwrap();
        prop_assert_eq!(parsed, a);
    }

    #[test]
    fn changing_any_component_changes_address(
        payment in arb_credential(),
        staking in arb_credential(),
        other in arb_credential(),
    ) {
        let base = derive_address(Network::Mainnet, payment, Some(staking));
        prop_assert_ne!(base, derive_address(Network::Preprod, payment, Some(staking)));
        prop_assert_ne!(base, derive_address(Network::Mainnet, payment, None));
        if other != payment {
            prop_assert_ne!(base, derive_address(Network::Mainnet, other, Some(staking)));
        }
        if other != staking {
            prop_assert_ne!(base, derive_address(Network::Mainnet, payment, Some(other)));
        }
    }

    #[test]
    fn withdraw_script_application_is_deterministic(owner in arb_hash()) {
        let a = WITHDRAW_PUBLISH.instantiate(ScriptKind::Validator, &OwnerParams { owner }).unwrap();
        let b = WITHDRAW_PUBLISH.instantiate(ScriptKind::Validator, &OwnerParams { owner }).unwrap();
        prop_assert_eq!(a.single_cbor(), b.single_cbor());
        prop_assert_eq!(contract_address(Network::Preview, owner), contract_address(Network::Preview, owner));
    }
}

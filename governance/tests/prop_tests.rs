//! Property tests over the treasury invariants: every internally recorded
//! unit is matched by external custody, and proportional redemption never
//! pays out more than the claim.

use guildhall_governance::{fair_share, GuildEngine, Vote};
use guildhall_ledger::{AccountKey, InMemoryVault, TokenVault};
use guildhall_types::{Address, GuildConfig, Timestamp, TokenAmount};
use proptest::prelude::*;

const PERIOD_SECS: u64 = 17_280;

fn addr(name: &str) -> Address {
    Address::new(format!("0x{name}"))
}

fn conserved(engine: &GuildEngine, vault: &InMemoryVault, token: &Address) -> bool {
    engine
        .ledger()
        .total_for_token(token)
        .map(|total| total == vault.custody_balance(token))
        .unwrap_or(false)
}

proptest! {
    /// Submit → sponsor → vote → process → (ragequit → withdraw), with the
    /// ledger total matching vault custody after every step.
    #[test]
    fn full_lifecycle_conserves_every_token_unit(
        tribute in 0u128..1_000_000_000_000_000_000,
        shares in 0u128..10_000,
        loot in 0u128..10_000,
        approves in any::<bool>(),
    ) {
        let summoner = addr("summoner");
        let alpha = addr("alpha");
        let alice = addr("alice");
        let mut now = Timestamp::new(1_700_000_000);
        let mut engine = GuildEngine::summon(
            summoner.clone(),
            vec![alpha.clone()],
            GuildConfig::default(),
            now,
        )
        .unwrap();
        let mut vault = InMemoryVault::new(addr("bank"));
        vault.mint(&alpha, &alice, TokenAmount::new(tribute));
        vault.mint(&alpha, &summoner, TokenAmount::new(10));

        engine
            .submit_proposal(
                &alice,
                alice.clone(),
                shares,
                loot,
                TokenAmount::new(tribute),
                alpha.clone(),
                TokenAmount::ZERO,
                alpha.clone(),
                "",
                &mut vault,
            )
            .unwrap();
        prop_assert!(conserved(&engine, &vault, &alpha));

        engine.sponsor_proposal(&summoner, 0, &mut vault, now).unwrap();
        prop_assert!(conserved(&engine, &vault, &alpha));

        now = Timestamp::new(now.as_secs() + PERIOD_SECS);
        let ballot = if approves { Vote::Yes } else { Vote::No };
        engine.submit_vote(&summoner, 0, ballot, now).unwrap();

        now = Timestamp::new(now.as_secs() + 70 * PERIOD_SECS);
        let passed = engine.process_proposal(&summoner, 0, &mut vault, now).unwrap();
        prop_assert_eq!(passed, approves);
        prop_assert!(conserved(&engine, &vault, &alpha));

        if passed && shares + loot > 0 {
            engine.ragequit(&alice, shares, loot).unwrap();
            prop_assert!(conserved(&engine, &vault, &alpha));

            let claim = engine.balance_of(&AccountKey::member(alice.clone()), &alpha);
            engine
                .withdraw_balances(&alice, &[alpha.clone()], &[claim], false, &mut vault)
                .unwrap();
            prop_assert!(conserved(&engine, &vault, &alpha));
            prop_assert_eq!(
                engine.balance_of(&AccountKey::member(alice.clone()), &alpha),
                TokenAmount::ZERO
            );

            // Claim is proportional, truncated toward the guild.
            let total = 1 + shares + loot;
            prop_assert_eq!(claim.raw(), tribute * (shares + loot) / total);
        }
    }

    /// The redemption formula is bounded by the balance and superadditive:
    /// splitting a burn across two ragequits never pays more than one.
    #[test]
    fn fair_share_bounded_and_superadditive(
        balance in any::<u128>(),
        total in 1u128..(1u128 << 64),
        a in any::<u128>(),
        b in any::<u128>(),
    ) {
        let burn_a = a % (total / 2 + 1);
        let burn_b = b % (total / 2 + 1);

        let share_a = fair_share(balance, burn_a, total).unwrap();
        let share_b = fair_share(balance, burn_b, total).unwrap();
        let combined = fair_share(balance, burn_a + burn_b, total).unwrap();

        prop_assert!(combined <= balance);
        prop_assert!(share_a + share_b <= combined);
    }

    /// Burning the entire membership drains the balance exactly.
    #[test]
    fn full_burn_redeems_everything(
        balance in any::<u128>(),
        total in 1u128..(1u128 << 64),
    ) {
        prop_assert_eq!(fair_share(balance, total, total).unwrap(), balance);
    }
}

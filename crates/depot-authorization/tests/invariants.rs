//! Generated chains checked against the ownership and shadowing rules

use depot_core::{Permission, PermissionSet, Role};
use depot_testkit::TestWorld;
use proptest::prelude::*;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

fn role() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::SuperAdmin),
        Just(Role::Admin),
        Just(Role::User),
        Just(Role::Pending),
    ]
}

fn permission_set() -> impl Strategy<Value = PermissionSet> {
    (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(r, w, d)| {
        Permission::ALL
            .into_iter()
            .zip([r, w, d])
            .filter_map(|(p, keep)| keep.then_some(p))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// The owner is allowed everything regardless of role, grants or publicity.
    #[test]
    fn owner_always_allowed(
        owner_role in role(),
        depth in 1usize..6,
        public in any::<bool>(),
        own_grant in proptest::option::of(permission_set()),
    ) {
        let allowed = runtime().block_on(async {
            let world = TestWorld::new();
            let owner = world.add_user("owner@depot.test", owner_role).await;
            let chain = world.add_chain(&owner, depth).await;
            let leaf = chain.last().unwrap();
            if public {
                let dir = world.add_public_dir(&owner, "pub", Some(leaf)).await;
                return world.resolver().can_access(&owner, &dir.id, Permission::Delete).await.unwrap();
            }
            if let Some(set) = own_grant {
                world.grant(&owner, &chain[0], set).await;
            }
            let mut all = true;
            for action in Permission::ALL {
                all &= world.resolver().can_access(&owner, &leaf.id, action).await.unwrap();
            }
            all
        });
        prop_assert!(allowed);
    }

    /// Only the grant nearest the target decides, within the role ceiling.
    #[test]
    fn nearest_grant_decides(
        depth in 2usize..7,
        near_offset in 0usize..6,
        far_offset in 0usize..6,
        near in permission_set(),
        far in permission_set(),
        grantee_role in prop_oneof![Just(Role::Admin), Just(Role::User), Just(Role::Pending)],
    ) {
        // Chain is root first; index depth-1 is the target.
        let near_at = depth - 1 - near_offset.min(depth - 1);
        let far_at = near_at.saturating_sub(1 + far_offset.min(near_at));

        let outcomes = runtime().block_on(async {
            let world = TestWorld::new();
            let owner = world.add_user("owner@depot.test", Role::User).await;
            let grantee = world.add_user("grantee@depot.test", grantee_role).await;
            let chain = world.add_chain(&owner, depth).await;
            let target = &chain[depth - 1];
            if far_at != near_at {
                world.grant(&grantee, &chain[far_at], far.clone()).await;
            }
            world.grant(&grantee, &chain[near_at], near.clone()).await;

            let mut outcomes = Vec::new();
            for action in Permission::ALL {
                let got = world.resolver().can_access(&grantee, &target.id, action).await.unwrap();
                outcomes.push((action, got));
            }
            outcomes
        });

        let ceiling = grantee_role.capabilities();
        for (action, got) in outcomes {
            prop_assert_eq!(got, ceiling.allows(action) && near.contains(action));
        }
    }
}

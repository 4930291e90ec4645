#[cfg(test)]
mod test_points {
    use chrono::Utc;
    use ecostep::{
        level_for_points, points_awarded, Category, EntryDetails, MemoryStore, NewCarbonEntry,
        Store,
    };
    use ecostep::models::NewUser;
    use rust_decimal_macros::dec;
    use std::sync::Arc;
    use uuid::Uuid;

    fn entry_for(user_id: Uuid, amount: rust_decimal::Decimal) -> NewCarbonEntry {
        NewCarbonEntry {
            user_id,
            category: Category::Food,
            amount,
            details: EntryDetails::default(),
            date: Utc::now(),
        }
    }

    #[test]
    fn test_award_table() {
        assert_eq!(points_awarded(dec!(0)), 50);
        assert_eq!(points_awarded(dec!(4.5)), 45);
        assert_eq!(points_awarded(dec!(39.99)), 10);
        assert_eq!(points_awarded(dec!(40)), 10);
        assert_eq!(points_awarded(dec!(35)), 15);
        assert_eq!(points_awarded(dec!(100000)), 10);
    }

    #[test]
    fn test_levels_follow_points() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(999), 1);
        assert_eq!(level_for_points(1000), 2);
        assert_eq!(level_for_points(2450), 3);
    }

    #[tokio::test]
    async fn test_parallel_submissions_keep_every_award() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let user_id = store
            .create_user(NewUser {
                name: "Jane Doe".to_string(),
                email: "jane@example.com".to_string(),
                password_hash: "pbkdf2_sha256$1000$salt$hash".to_string(),
            })
            .await
            .unwrap()
            .id;

        let amounts = [dec!(0), dec!(5), dec!(12.5), dec!(60), dec!(1.25)];
        let expected: i64 = amounts.iter().map(|a| points_awarded(*a)).sum::<i64>() * 20;

        let mut handles = Vec::new();
        for _ in 0..20 {
            for amount in amounts {
                let store = store.clone();
                handles.push(tokio::spawn(async move {
                    store
                        .record_entry(entry_for(user_id, amount), points_awarded(amount))
                        .await
                        .unwrap()
                }));
            }
        }

        let mut totals = Vec::new();
        for handle in handles {
            totals.push(handle.await.unwrap().total_points.unwrap());
        }

        let user = store.get_user(user_id).await.unwrap().unwrap();
        assert_eq!(user.points, expected);
        // Every award observed a distinct running total
        totals.sort_unstable();
        totals.dedup();
        assert_eq!(totals.len(), 100);
        assert_eq!(totals.last().copied(), Some(expected));
    }
}

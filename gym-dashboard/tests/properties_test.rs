mod common;

use std::collections::BTreeSet;

use proptest::prelude::*;
use uuid::Uuid;

use common::{client, feedback};
use gym_dashboard::pages::clients::{client_stats, client_view};
use gym_dashboard::pages::feedback::{feedback_stats, feedback_view};
use gym_dashboard::pages::{ClientFilters, ClientSort, FeedbackFilters, FeedbackSort, StatusFilter};

proptest! {
    #[test]
    fn client_buckets_partition_the_roster(assignments in prop::collection::vec(any::<bool>(), 0..40)) {
        let clients: Vec<_> = assignments
            .iter()
            .enumerate()
            .map(|(index, assigned)| {
                client("Client", &index.to_string(), assigned.then(Uuid::new_v4), index as i64)
            })
            .collect();

        let stats = client_stats(&clients);
        prop_assert_eq!(stats.total, clients.len());
        prop_assert_eq!(stats.active + stats.unassigned, stats.total);

        let active = ClientFilters { status: StatusFilter::Active, ..Default::default() };
        let unassigned = ClientFilters { status: StatusFilter::Unassigned, ..Default::default() };
        prop_assert_eq!(client_view(&clients, &active).len(), stats.active);
        prop_assert_eq!(client_view(&clients, &unassigned).len(), stats.unassigned);
    }

    #[test]
    fn recent_sort_is_descending(ages in prop::collection::vec(-365i64..365, 0..30)) {
        let clients: Vec<_> = ages.iter().map(|age| client("A", "B", None, *age)).collect();
        let filters = ClientFilters { sort: ClientSort::Recent, ..Default::default() };

        let view = client_view(&clients, &filters);
        prop_assert!(view.windows(2).all(|pair| pair[0].created_at >= pair[1].created_at));
    }

    #[test]
    fn rating_filter_keeps_exactly_selected_ratings(
        ratings in prop::collection::vec(1i32..=5, 0..50),
        selected in prop::collection::btree_set(1i32..=5, 0..=5),
    ) {
        let trainer_id = Uuid::new_v4();
        let feedbacks: Vec<_> = ratings
            .iter()
            .enumerate()
            .map(|(index, rating)| feedback(*rating, trainer_id, index as i64))
            .collect();

        let filters = FeedbackFilters { ratings: selected.clone(), ..Default::default() };
        let view = feedback_view(&feedbacks, &filters);

        let expected = if selected.is_empty() {
            ratings.len()
        } else {
            ratings.iter().filter(|rating| selected.contains(rating)).count()
        };
        prop_assert_eq!(view.len(), expected);
        prop_assert!(view.iter().all(|f| selected.is_empty() || selected.contains(&f.rating)));
    }

    #[test]
    fn rating_stats_are_consistent(ratings in prop::collection::vec(1i32..=5, 0..50)) {
        let feedbacks: Vec<_> = ratings
            .iter()
            .map(|rating| feedback(*rating, Uuid::new_v4(), 0))
            .collect();

        let stats = feedback_stats(&feedbacks);
        prop_assert_eq!(stats.distribution.iter().sum::<usize>(), ratings.len());
        match stats.average_rating {
            Some(average) => prop_assert!((1.0..=5.0).contains(&average)),
            None => prop_assert!(ratings.is_empty()),
        }

        let high = FeedbackFilters { sort: FeedbackSort::RatingHigh, ..Default::default() };
        let sorted: Vec<i32> = feedback_view(&feedbacks, &high).iter().map(|f| f.rating).collect();
        prop_assert!(sorted.windows(2).all(|pair| pair[0] >= pair[1]));
        prop_assert_eq!(
            sorted.iter().copied().collect::<BTreeSet<_>>(),
            ratings.iter().copied().collect::<BTreeSet<_>>()
        );
    }
}

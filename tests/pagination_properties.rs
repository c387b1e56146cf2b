use product_catalog::pagination::{PRODUCTS_PER_PAGE, Paginator};
use proptest::prelude::*;

fn paginate(items: &[u32]) -> Vec<Vec<u32>> {
    let paginator = Paginator::new(items.len() as i64, PRODUCTS_PER_PAGE);

    (1..=paginator.num_pages())
        .map(|number| {
            let (offset, limit) = paginator.bounds(number);
            items
                .iter()
                .skip(offset as usize)
                .take(limit as usize)
                .copied()
                .collect()
        })
        .collect()
}

proptest! {
    #[test]
    fn pages_partition_the_result_set(items in prop::collection::vec(any::<u32>(), 1..50)) {
        let pages = paginate(&items);

        prop_assert_eq!(pages.len(), items.len().div_ceil(3));
        prop_assert!(pages.iter().all(|page| !page.is_empty() && page.len() <= 3));
        prop_assert_eq!(pages.concat(), items);
    }

    #[test]
    fn any_page_parameter_resolves_to_a_valid_page(
        count in 0i64..100,
        raw in prop::option::of(".{0,6}"),
    ) {
        let paginator = Paginator::new(count, PRODUCTS_PER_PAGE);
        let number = paginator.resolve(raw.as_deref());

        prop_assert!(number >= 1);
        prop_assert!(number <= paginator.num_pages());
    }

    #[test]
    fn integer_page_parameter_is_clamped(count in 1i64..100, requested in -10i64..60) {
        let paginator = Paginator::new(count, PRODUCTS_PER_PAGE);
        let number = paginator.resolve(Some(&requested.to_string()));

        prop_assert_eq!(number, requested.clamp(1, paginator.num_pages()));
    }
}

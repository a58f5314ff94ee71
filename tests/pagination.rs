#[cfg(test)]
mod tests {
    use dexus::libs::pagination::{Pagination, DEFAULT_PER_PAGE};

    #[test]
    fn test_first_page() {
        let page = Pagination::new(1, 10).resolve(25);
        assert_eq!(page.total_pages, 3);
        assert_eq!((page.start, page.end), (1, 10));
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_last_partial_page() {
        let page = Pagination::new(3, 10).resolve(25);
        assert_eq!(page.page, 3);
        assert_eq!((page.start, page.end), (21, 25));
        assert_eq!(page.offset, 20);
    }

    #[test]
    fn test_out_of_range_values_are_corrected() {
        let page = Pagination::new(0, 0).resolve(25);
        assert_eq!(page.page, 1);
        assert_eq!(page.per_page, DEFAULT_PER_PAGE);

        let page = Pagination::new(9, 10).resolve(25);
        assert_eq!(page.page, 3);
        assert_eq!(page.start, 21);
    }

    #[test]
    fn test_empty_result() {
        let page = Pagination::new(4, 10).resolve(0);
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.start, 0);
        assert_eq!(page.end, 0);
        assert_eq!(page.page, 4);
    }

    #[test]
    fn test_defaults_from_query() {
        let pagination: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(pagination, Pagination::default());
    }
}

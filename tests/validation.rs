#[cfg(test)]
mod tests {
    use dexus::libs::dates::{parse_date, to_storage_date, to_user_date};
    use dexus::libs::validation::*;

    #[test]
    fn test_cpf_check_digits() {
        assert!(validate_cpf("52998224725"));
        assert!(validate_cpf("529.982.247-25"));
        assert!(validate_cpf("111.444.777-35"));
        assert!(!validate_cpf("52998224724"));
        assert!(!validate_cpf("11111111111"));
        assert!(!validate_cpf("5299822472"));
    }

    #[test]
    fn test_cnpj_check_digits() {
        assert!(validate_cnpj("11222333000181"));
        assert!(validate_cnpj("11.222.333/0001-81"));
        assert!(!validate_cnpj("11222333000182"));
        assert!(!validate_cnpj("00000000000000"));
        assert!(!validate_cnpj("52998224725"));
    }

    #[test]
    fn test_email() {
        assert!(validate_email("os@acme.com.br"));
        assert!(validate_email(" finance+os@acme.io "));
        assert!(!validate_email("acme.com.br"));
        assert!(!validate_email("os@acme"));
        assert!(!validate_email("os @acme.com"));
    }

    #[test]
    fn test_clock_and_span_times() {
        assert!(validate_time("00:00"));
        assert!(validate_time("23:59"));
        assert!(!validate_time("24:00"));
        assert!(!validate_time("8:00"));
        assert!(!validate_time("08:60"));

        assert!(validate_duration("00:30"));
        assert!(validate_duration("137:45"));
        assert!(!validate_duration("01:75"));
        assert!(!validate_duration("1:00"));
        assert!(validate_duration("999999:59"));
        assert!(!validate_duration("1000000:00"));
        assert!(!validate_duration("99999999999999999999:00"));
    }

    #[test]
    fn test_user_dates() {
        assert!(validate_date("29/02/2024"));
        assert!(!validate_date("29/02/2023"));
        assert!(!validate_date("2024-02-29"));
        assert!(!validate_date("31/04/2024"));
    }

    #[test]
    fn test_small_checks() {
        assert!(validate_phone("(11) 98765-4321"));
        assert!(validate_phone("1133334444"));
        assert!(!validate_phone("98765-4321"));
        assert!(validate_cep("01310-100"));
        assert!(!validate_cep("0131010"));
        assert!(validate_uf("sp"));
        assert!(!validate_uf("XX"));
    }

    #[test]
    fn test_formatters() {
        assert_eq!(format_cpf("52998224725"), "529.982.247-25");
        assert_eq!(format_cnpj("11222333000181"), "11.222.333/0001-81");
        assert_eq!(format_document("11222333000181"), "11.222.333/0001-81");
        assert_eq!(format_document("529.982.247-25"), "529.982.247-25");
        assert_eq!(format_document("123"), "123");
        assert_eq!(format_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(format_phone("1133334444"), "(11) 3333-4444");
        assert_eq!(format_cep("01310100"), "01310-100");
        assert_eq!(format_money(1234.56), "R$ 1.234,56");
        assert_eq!(format_money(0.5), "R$ 0,50");
        assert_eq!(format_money(1_000_000.0), "R$ 1.000.000,00");
    }

    #[test]
    fn test_blank_and_digits() {
        assert_eq!(blank_to_none(Some("  ")), None);
        assert_eq!(blank_to_none(None), None);
        assert_eq!(blank_to_none(Some(" ACME ")), Some("ACME".to_string()));
        assert_eq!(only_digits("11.222.333/0001-81"), "11222333000181");
    }

    #[test]
    fn test_date_conversion() {
        assert_eq!(to_storage_date("15/03/2025"), "2025-03-15");
        assert_eq!(to_user_date("2025-03-15"), "15/03/2025");
        assert_eq!(to_user_date(&to_storage_date("01/12/2024")), "01/12/2024");
    }

    #[test]
    fn test_date_conversion_passes_invalid_input_through() {
        assert_eq!(to_storage_date("2025-03-15"), "2025-03-15");
        assert_eq!(to_storage_date("15/3/2025"), "15/3/2025");
        assert_eq!(to_user_date("15/03/2025"), "15/03/2025");
        assert_eq!(to_user_date(""), "");
    }

    #[test]
    fn test_parse_date_accepts_both_forms() {
        let expected = chrono::NaiveDate::from_ymd_opt(2025, 3, 15);
        assert_eq!(parse_date("15/03/2025"), expected);
        assert_eq!(parse_date("2025-03-15"), expected);
        assert_eq!(parse_date("31/02/2025"), None);
        assert_eq!(parse_date("tomorrow"), None);
    }
}

#[cfg(test)]
mod tests {
    use crate::accounts::{Account, AccountRepositoryTrait, NewAccount};
    use crate::errors::{DatabaseError, Error, Result};
    use crate::ledger::{
        InvestmentOrder, LedgerRepositoryTrait, OrderAction, Transaction, TransactionKind,
        Transfer,
    };
    use crate::portfolio::wealth::{WealthService, WealthServiceTrait};
    use crate::quotes::{PriceMatrix, PricePoint, QuoteServiceTrait, RangeFailure, SyncResult};
    use crate::utils::time_utils::get_days_between;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    // --- Mock AccountRepository ---
    struct MockAccountRepository {
        accounts: Vec<Account>,
    }

    #[async_trait]
    impl AccountRepositoryTrait for MockAccountRepository {
        async fn create(&self, _new_account: NewAccount) -> Result<Account> {
            unimplemented!()
        }

        async fn ensure_exist(&self, _names: Vec<String>) -> Result<usize> {
            unimplemented!()
        }

        async fn update_initial_balance(
            &self,
            _name: &str,
            _initial_balance: Decimal,
        ) -> Result<Account> {
            unimplemented!()
        }

        fn list(&self) -> Result<Vec<Account>> {
            Ok(self.accounts.clone())
        }
    }

    // --- Mock LedgerRepository ---
    #[derive(Default)]
    struct MockLedgerRepository {
        transactions: Vec<Transaction>,
        transfers: Vec<Transfer>,
        orders: Vec<InvestmentOrder>,
    }

    #[async_trait]
    impl LedgerRepositoryTrait for MockLedgerRepository {
        fn list_transactions(&self, until: Option<NaiveDate>) -> Result<Vec<Transaction>> {
            Ok(self
                .transactions
                .iter()
                .filter(|t| !t.is_excluded && until.map_or(true, |u| t.date <= u))
                .cloned()
                .collect())
        }

        fn list_transfers(&self, until: Option<NaiveDate>) -> Result<Vec<Transfer>> {
            Ok(self
                .transfers
                .iter()
                .filter(|t| until.map_or(true, |u| t.date <= u))
                .cloned()
                .collect())
        }

        fn list_investment_orders(&self, until: Option<NaiveDate>) -> Result<Vec<InvestmentOrder>> {
            Ok(self
                .orders
                .iter()
                .filter(|o| until.map_or(true, |u| o.date <= u))
                .cloned()
                .collect())
        }

        fn list_all_transactions(&self, _year: Option<i32>) -> Result<Vec<Transaction>> {
            unimplemented!()
        }

        fn distinct_account_names(&self) -> Result<Vec<String>> {
            unimplemented!()
        }

        async fn insert_transactions(&self, _transactions: Vec<Transaction>) -> Result<usize> {
            unimplemented!()
        }

        async fn insert_transfers(&self, _transfers: Vec<Transfer>) -> Result<usize> {
            unimplemented!()
        }

        async fn insert_investment_order(
            &self,
            _order: InvestmentOrder,
        ) -> Result<InvestmentOrder> {
            unimplemented!()
        }

        async fn set_transaction_excluded(
            &self,
            _id: &str,
            _is_excluded: bool,
        ) -> Result<Transaction> {
            unimplemented!()
        }
    }

    // --- Mock QuoteService ---
    #[derive(Default)]
    struct MockQuoteService {
        rows: Vec<PricePoint>,
        fail_reads: bool,
        sync_result: SyncResult,
        ensure_calls: Mutex<Vec<(Vec<String>, NaiveDate, NaiveDate)>>,
    }

    #[async_trait]
    impl QuoteServiceTrait for MockQuoteService {
        async fn ensure_coverage(
            &self,
            tickers: &[String],
            start: NaiveDate,
            today: NaiveDate,
        ) -> SyncResult {
            self.ensure_calls
                .lock()
                .unwrap()
                .push((tickers.to_vec(), start, today));
            self.sync_result.clone()
        }

        fn read_coverage(
            &self,
            tickers: &[String],
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<PriceMatrix> {
            if self.fail_reads {
                return Err(Error::Database(DatabaseError::Internal(
                    "cache offline".to_string(),
                )));
            }
            Ok(PriceMatrix::build(
                get_days_between(start, end),
                tickers,
                &self.rows,
                &HashMap::new(),
            ))
        }

        fn latest_price_on_or_before(
            &self,
            _ticker: &str,
            _date: NaiveDate,
        ) -> Result<Option<Decimal>> {
            unimplemented!()
        }
    }

    fn account(name: &str, initial_balance: Decimal) -> Account {
        Account {
            name: name.to_string(),
            initial_balance,
        }
    }

    fn tx(date: NaiveDate, account: &str, amount: Decimal, kind: TransactionKind) -> Transaction {
        Transaction {
            id: format!("{}-{}-{}", account, date, amount),
            date,
            category: "Misc".to_string(),
            account: account.to_string(),
            amount,
            currency: "EUR".to_string(),
            comment: String::new(),
            kind,
            is_excluded: false,
        }
    }

    fn transfer(date: NaiveDate, from: &str, to: &str, amount: Decimal) -> Transfer {
        Transfer {
            id: format!("{}-{}-{}", from, to, date),
            date,
            source_account: from.to_string(),
            target_account: to.to_string(),
            amount,
            comment: String::new(),
        }
    }

    fn order(
        date: NaiveDate,
        action: OrderAction,
        quantity: Decimal,
        unit_price: Decimal,
        fees: Decimal,
    ) -> InvestmentOrder {
        InvestmentOrder {
            id: format!("{}-{}", action, date),
            date,
            ticker: "X".to_string(),
            name: "X Corp".to_string(),
            action,
            quantity,
            unit_price,
            fees,
            account: "Broker".to_string(),
            comment: String::new(),
        }
    }

    fn engine(
        accounts: Vec<Account>,
        ledger: MockLedgerRepository,
        quotes: MockQuoteService,
    ) -> (WealthService, Arc<MockQuoteService>) {
        let quotes = Arc::new(quotes);
        (
            WealthService::new(
                Arc::new(MockAccountRepository { accounts }),
                Arc::new(ledger),
                quotes.clone(),
            ),
            quotes,
        )
    }

    #[tokio::test]
    async fn test_income_and_expense_scenario() {
        let (service, _) = engine(
            vec![account("Checking", dec!(1000))],
            MockLedgerRepository {
                transactions: vec![
                    tx(d(2), "Checking", dec!(500), TransactionKind::Income),
                    tx(d(3), "Checking", dec!(200), TransactionKind::Expense),
                ],
                ..Default::default()
            },
            MockQuoteService::default(),
        );

        let table = service
            .calculate_wealth_evolution_as_of(Some(d(1)), d(3))
            .await
            .unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.row(d(1)).unwrap().total_wealth, dec!(1000));
        assert_eq!(table.row(d(2)).unwrap().total_wealth, dec!(1500));
        assert_eq!(table.row(d(3)).unwrap().total_wealth, dec!(1300));
        assert_eq!(table.row(d(3)).unwrap().total_invest, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_buy_without_market_price_uses_last_trade_price() {
        let (service, quotes) = engine(
            vec![account("Broker", Decimal::ZERO)],
            MockLedgerRepository {
                orders: vec![order(d(1), OrderAction::Buy, dec!(10), dec!(100), dec!(5))],
                ..Default::default()
            },
            MockQuoteService::default(),
        );

        let table = service
            .calculate_wealth_evolution_as_of(None, d(2))
            .await
            .unwrap();

        let day2 = table.row(d(2)).unwrap();
        assert_eq!(day2.total_invest, dec!(1000));
        assert_eq!(day2.account_value("Broker"), Some(dec!(-5)));
        assert_eq!(day2.total_wealth, dec!(-5));
        assert_eq!(
            quotes.ensure_calls.lock().unwrap().clone(),
            vec![(vec!["X".to_string()], d(1), d(2))]
        );
    }

    #[tokio::test]
    async fn test_market_price_takes_precedence_over_trade_price() {
        let (service, _) = engine(
            vec![account("Broker", dec!(2000))],
            MockLedgerRepository {
                orders: vec![order(d(1), OrderAction::Buy, dec!(10), dec!(100), Decimal::ZERO)],
                ..Default::default()
            },
            MockQuoteService {
                rows: vec![PricePoint {
                    ticker: "X".to_string(),
                    date: d(2),
                    price: dec!(120),
                }],
                ..Default::default()
            },
        );

        let table = service
            .calculate_wealth_evolution_as_of(None, d(3))
            .await
            .unwrap();

        // Day 1 is backward-filled from the first cached price.
        assert_eq!(table.row(d(1)).unwrap().total_invest, dec!(1200));
        assert_eq!(table.row(d(3)).unwrap().total_invest, dec!(1200));
        assert_eq!(table.row(d(3)).unwrap().total_wealth, dec!(2200));
    }

    #[tokio::test]
    async fn test_transfer_moves_cash_without_changing_total() {
        let (service, _) = engine(
            vec![account("A", dec!(1000)), account("B", Decimal::ZERO)],
            MockLedgerRepository {
                transfers: vec![transfer(d(1), "A", "B", dec!(300))],
                ..Default::default()
            },
            MockQuoteService::default(),
        );

        let table = service
            .calculate_wealth_evolution_as_of(None, d(1))
            .await
            .unwrap();

        let day1 = table.row(d(1)).unwrap();
        assert_eq!(day1.account_value("A"), Some(dec!(700)));
        assert_eq!(day1.account_value("B"), Some(dec!(300)));
        assert_eq!(day1.total_wealth, dec!(1000));
    }

    #[tokio::test]
    async fn test_selling_more_than_held_goes_negative() {
        let (service, _) = engine(
            vec![account("Broker", Decimal::ZERO)],
            MockLedgerRepository {
                orders: vec![
                    order(d(1), OrderAction::Buy, dec!(2), dec!(50), Decimal::ZERO),
                    order(d(2), OrderAction::Sell, dec!(5), dec!(60), dec!(1)),
                ],
                ..Default::default()
            },
            MockQuoteService::default(),
        );

        let table = service
            .calculate_wealth_evolution_as_of(None, d(2))
            .await
            .unwrap();

        let day2 = table.row(d(2)).unwrap();
        // -100 + 299 cash, -3 shares at the last trade price of 60.
        assert_eq!(day2.total_invest, dec!(-180));
        assert_eq!(day2.total_wealth, dec!(199) - dec!(180));
    }

    #[tokio::test]
    async fn test_calendar_is_gapless_and_spans_to_today() {
        let (service, _) = engine(
            vec![account("Checking", Decimal::ZERO)],
            MockLedgerRepository {
                transactions: vec![tx(d(5), "Checking", dec!(1), TransactionKind::Income)],
                ..Default::default()
            },
            MockQuoteService::default(),
        );

        let table = service
            .calculate_wealth_evolution_as_of(None, d(31))
            .await
            .unwrap();

        let dates: Vec<NaiveDate> = table.rows.iter().map(|r| r.date).collect();
        assert_eq!(dates, get_days_between(d(5), d(31)));
    }

    #[tokio::test]
    async fn test_events_before_start_are_folded_into_first_day() {
        let (service, _) = engine(
            vec![account("Checking", dec!(100))],
            MockLedgerRepository {
                transactions: vec![
                    tx(d(1), "Checking", dec!(50), TransactionKind::Income),
                    tx(d(4), "Checking", dec!(10), TransactionKind::Expense),
                ],
                ..Default::default()
            },
            MockQuoteService::default(),
        );

        let table = service
            .calculate_wealth_evolution_as_of(Some(d(3)), d(4))
            .await
            .unwrap();

        assert_eq!(table.rows.first().unwrap().date, d(3));
        assert_eq!(table.row(d(3)).unwrap().total_wealth, dec!(150));
        assert_eq!(table.row(d(4)).unwrap().total_wealth, dec!(140));
    }

    #[tokio::test]
    async fn test_events_after_today_are_ignored() {
        let (service, _) = engine(
            vec![account("Checking", dec!(10))],
            MockLedgerRepository {
                transactions: vec![
                    tx(d(1), "Checking", dec!(5), TransactionKind::Income),
                    tx(d(20), "Checking", dec!(500), TransactionKind::Income),
                ],
                ..Default::default()
            },
            MockQuoteService::default(),
        );

        let table = service
            .calculate_wealth_evolution_as_of(None, d(2))
            .await
            .unwrap();

        assert_eq!(table.rows.last().unwrap().date, d(2));
        assert_eq!(table.rows.last().unwrap().total_wealth, dec!(15));
    }

    #[tokio::test]
    async fn test_unknown_account_gets_a_column() {
        let (service, _) = engine(
            vec![],
            MockLedgerRepository {
                transactions: vec![tx(d(1), "Wallet", dec!(20), TransactionKind::Income)],
                ..Default::default()
            },
            MockQuoteService::default(),
        );

        let table = service
            .calculate_wealth_evolution_as_of(None, d(2))
            .await
            .unwrap();

        assert_eq!(table.accounts, vec!["Wallet".to_string()]);
        assert_eq!(table.row(d(2)).unwrap().account_value("Wallet"), Some(dec!(20)));
    }

    #[tokio::test]
    async fn test_empty_ledger_returns_empty_table() {
        let (service, _) = engine(vec![], MockLedgerRepository::default(), MockQuoteService::default());

        let table = service
            .calculate_wealth_evolution_as_of(None, d(2))
            .await
            .unwrap();

        assert!(table.is_empty());
    }

    #[tokio::test]
    async fn test_accounts_without_events_start_today() {
        let (service, _) = engine(
            vec![account("Checking", dec!(42))],
            MockLedgerRepository::default(),
            MockQuoteService::default(),
        );

        let table = service
            .calculate_wealth_evolution_as_of(None, d(9))
            .await
            .unwrap();

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].date, d(9));
        assert_eq!(table.rows[0].total_wealth, dec!(42));
    }

    #[tokio::test]
    async fn test_start_after_today_is_rejected() {
        let (service, _) = engine(vec![], MockLedgerRepository::default(), MockQuoteService::default());

        let result = service.calculate_wealth_evolution_as_of(Some(d(5)), d(4)).await;

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_price_cache_failure_degrades_to_trade_price() {
        let (service, _) = engine(
            vec![account("Broker", Decimal::ZERO)],
            MockLedgerRepository {
                orders: vec![order(d(1), OrderAction::Buy, dec!(1), dec!(80), Decimal::ZERO)],
                ..Default::default()
            },
            MockQuoteService {
                fail_reads: true,
                ..Default::default()
            },
        );

        let table = service
            .calculate_wealth_evolution_as_of(None, d(3))
            .await
            .unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.row(d(3)).unwrap().total_invest, dec!(80));
        assert_eq!(table.row(d(3)).unwrap().total_wealth, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_failed_sync_values_from_cached_prices() {
        let (service, quotes) = engine(
            vec![account("Broker", dec!(100))],
            MockLedgerRepository {
                orders: vec![order(d(1), OrderAction::Buy, dec!(1), dec!(100), Decimal::ZERO)],
                ..Default::default()
            },
            MockQuoteService {
                rows: vec![PricePoint {
                    ticker: "X".to_string(),
                    date: d(1),
                    price: dec!(120),
                }],
                sync_result: SyncResult {
                    ranges_failed: 1,
                    failures: vec![RangeFailure {
                        ticker: "X".to_string(),
                        start: d(2),
                        end: d(3),
                        message: "provider unavailable".to_string(),
                    }],
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        let table = service
            .calculate_wealth_evolution_as_of(None, d(3))
            .await
            .unwrap();

        assert_eq!(quotes.ensure_calls.lock().unwrap().len(), 1);
        assert_eq!(table.rows.len(), 3);
        let day3 = table.row(d(3)).unwrap();
        assert_eq!(day3.total_invest, dec!(120));
        assert_eq!(day3.account_value("Broker"), Some(Decimal::ZERO));
        assert_eq!(day3.total_wealth, dec!(120));
    }

    #[tokio::test]
    async fn test_wealth_row_serializes_flat() {
        let (service, _) = engine(
            vec![account("Checking", dec!(1.5))],
            MockLedgerRepository::default(),
            MockQuoteService::default(),
        );
        let table = service
            .calculate_wealth_evolution_as_of(None, d(1))
            .await
            .unwrap();

        let json = serde_json::to_value(&table.rows[0]).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["Checking"], 1.5);
        assert_eq!(json["Total Invest"], 0.0);
        assert_eq!(json["Total Wealth"], 1.5);
    }
}

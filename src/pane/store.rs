use crate::pane::ratios::{LOAD_EPSILON, PaneRatios, RATIO_EPSILON};
use crate::storage::SessionStorage;
use crate::utils::{Result, WorkbenchError};

/// ペイン比率を保存するセッションストレージのキー
pub const PANE_RATIOS_KEY: &str = "openalgo.pane-ratios";

/// ペイン比率の共有状態
///
/// 変更のたびにセッションストレージへ保存し、生成時に前回の値を読み込む。
/// 合計1.0の不変条件は全ての書き込みで保たれる。
pub struct PaneRatioStore {
    ratios: PaneRatios,
    storage: Box<dyn SessionStorage>,
}

impl PaneRatioStore {
    /// ストレージから前回の比率を読み込んで初期化
    /// 存在しない・壊れている場合は均等分割
    pub fn load(storage: Box<dyn SessionStorage>) -> Self {
        let ratios = match storage.get(PANE_RATIOS_KEY) {
            Some(raw) => parse_persisted(&raw).unwrap_or_else(|| {
                log::debug!("Ignoring malformed persisted pane ratios: {:?}", raw);
                PaneRatios::default()
            }),
            None => PaneRatios::default(),
        };

        log::debug!("Pane ratios loaded: {:?}", ratios);
        Self { ratios, storage }
    }

    /// 現在の比率
    pub fn ratios(&self) -> PaneRatios {
        self.ratios
    }

    /// 3つの比率をまとめて設定（合計1.0に正規化）
    pub fn set_ratios(&mut self, details: f64, editor: f64, output: f64) -> Result<PaneRatios> {
        let ratios = PaneRatios::normalized(details, editor, output).ok_or_else(|| {
            WorkbenchError::invalid_ratios(format!(
                "details={details}, editor={editor}, output={output}"
            ))
        })?;

        self.replace(ratios);
        Ok(ratios)
    }

    /// 詳細ペインの比率を設定し、残りを他の2つに現在の比で配分
    pub fn set_details_ratio(&mut self, value: f64) -> Result<PaneRatios> {
        let (editor, output) = split_remainder(value, self.ratios.editor_ratio, self.ratios.output_ratio)?;
        self.set_ratios(value, editor, output)
    }

    /// エディタペインの比率を設定し、残りを他の2つに現在の比で配分
    pub fn set_editor_ratio(&mut self, value: f64) -> Result<PaneRatios> {
        let (details, output) = split_remainder(value, self.ratios.details_ratio, self.ratios.output_ratio)?;
        self.set_ratios(details, value, output)
    }

    /// 出力ペインの比率を設定し、残りを他の2つに現在の比で配分
    pub fn set_output_ratio(&mut self, value: f64) -> Result<PaneRatios> {
        let (details, editor) = split_remainder(value, self.ratios.details_ratio, self.ratios.editor_ratio)?;
        self.set_ratios(details, editor, value)
    }

    /// 均等分割に戻し、保存済みの値を消す
    pub fn reset(&mut self) {
        self.ratios = PaneRatios::default();
        if let Err(e) = self.storage.remove(PANE_RATIOS_KEY) {
            log::warn!("Failed to clear persisted pane ratios: {}", e);
        }
        log::info!("Pane ratios reset to even split");
    }

    fn replace(&mut self, ratios: PaneRatios) {
        debug_assert!((ratios.sum() - 1.0).abs() <= RATIO_EPSILON);
        if ratios == self.ratios {
            return;
        }
        self.ratios = ratios;
        self.persist();
    }

    /// 保存の失敗は警告のみ（状態の更新は止めない）
    fn persist(&mut self) {
        if let Err(e) = self.write_persisted() {
            log::warn!("Failed to persist pane ratios: {}", e);
        }
    }

    fn write_persisted(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.ratios)?;
        self.storage.set(PANE_RATIOS_KEY, &json)
    }
}

fn parse_persisted(raw: &str) -> Option<PaneRatios> {
    let ratios: PaneRatios = serde_json::from_str(raw).ok()?;
    if !ratios.is_valid(LOAD_EPSILON) {
        return None;
    }
    // Renormalize away the tolerated drift
    PaneRatios::normalized(ratios.details_ratio, ratios.editor_ratio, ratios.output_ratio)
}

/// `value` を除いた残り `1 - value` を `a : b` の比で分ける
fn split_remainder(value: f64, a: f64, b: f64) -> Result<(f64, f64)> {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        return Err(WorkbenchError::invalid_ratios(format!(
            "ratio {value} is outside (0, 1)"
        )));
    }

    let remainder = 1.0 - value;
    Ok((remainder * a / (a + b), remainder * b / (a + b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Storage whose contents outlive the store, to simulate a reload
    #[derive(Clone, Default)]
    struct SharedStorage(Rc<RefCell<MemoryStorage>>);

    impl SessionStorage for SharedStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.0.borrow_mut().set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<()> {
            self.0.borrow_mut().remove(key)
        }
    }

    struct FailingStorage;

    impl SessionStorage for FailingStorage {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(WorkbenchError::storage("disk full"))
        }

        fn remove(&mut self, _key: &str) -> Result<()> {
            Err(WorkbenchError::storage("disk full"))
        }
    }

    fn store_with(raw: &str) -> PaneRatioStore {
        let mut storage = MemoryStorage::new();
        storage.set(PANE_RATIOS_KEY, raw).unwrap();
        PaneRatioStore::load(Box::new(storage))
    }

    fn assert_close(actual: PaneRatios, details: f64, editor: f64, output: f64) {
        assert!((actual.details_ratio - details).abs() < 1e-9, "{actual:?}");
        assert!((actual.editor_ratio - editor).abs() < 1e-9, "{actual:?}");
        assert!((actual.output_ratio - output).abs() < 1e-9, "{actual:?}");
    }

    #[test]
    fn test_fresh_store_is_even() {
        let store = PaneRatioStore::load(Box::new(MemoryStorage::new()));
        assert_eq!(store.ratios(), PaneRatios::EVEN);
    }

    #[test]
    fn test_persist_then_reload() {
        let shared = SharedStorage::default();

        let mut store = PaneRatioStore::load(Box::new(shared.clone()));
        store.set_ratios(0.25, 0.5, 0.25).unwrap();
        drop(store);

        let reloaded = PaneRatioStore::load(Box::new(shared));
        assert_close(reloaded.ratios(), 0.25, 0.5, 0.25);
    }

    #[test]
    fn test_malformed_data_falls_back_to_default() {
        for raw in [
            "not json",
            r#"{"detailsRatio":0.5,"editorRatio":0.5}"#,
            r#"{"detailsRatio":"a","editorRatio":0.5,"outputRatio":0.25}"#,
            r#"{"detailsRatio":0.0,"editorRatio":0.5,"outputRatio":0.5}"#,
            r#"{"detailsRatio":0.5,"editorRatio":0.5,"outputRatio":0.5}"#,
            r#"{"detailsRatio":1.2,"editorRatio":-0.1,"outputRatio":-0.1}"#,
        ] {
            assert_eq!(store_with(raw).ratios(), PaneRatios::EVEN, "input: {raw}");
        }
    }

    #[test]
    fn test_small_drift_is_accepted_and_renormalized() {
        let store = store_with(r#"{"detailsRatio":0.2,"editorRatio":0.5,"outputRatio":0.3001}"#);
        let ratios = store.ratios();

        assert!((ratios.sum() - 1.0).abs() <= RATIO_EPSILON);
        assert!((ratios.details_ratio - 0.2).abs() < 1e-3);
    }

    #[test]
    fn test_set_ratios_renormalizes() {
        let mut store = PaneRatioStore::load(Box::new(MemoryStorage::new()));
        store.set_ratios(2.0, 1.0, 1.0).unwrap();
        assert_close(store.ratios(), 0.5, 0.25, 0.25);
    }

    #[test]
    fn test_set_ratios_rejects_invalid_and_keeps_state() {
        let mut store = PaneRatioStore::load(Box::new(MemoryStorage::new()));
        store.set_ratios(0.5, 0.25, 0.25).unwrap();

        assert!(matches!(
            store.set_ratios(0.5, f64::NAN, 0.5),
            Err(WorkbenchError::InvalidRatios(_))
        ));
        assert!(store.set_ratios(0.5, 0.0, 0.5).is_err());
        assert_close(store.ratios(), 0.5, 0.25, 0.25);
    }

    #[test]
    fn test_single_setters_keep_sum() {
        let mut store = PaneRatioStore::load(Box::new(MemoryStorage::new()));
        store.set_ratios(0.2, 0.6, 0.2).unwrap();

        // Remaining 0.5 is split 3:1 between editor and output
        store.set_details_ratio(0.5).unwrap();
        assert_close(store.ratios(), 0.5, 0.375, 0.125);

        store.set_editor_ratio(0.25).unwrap();
        assert!((store.ratios().sum() - 1.0).abs() <= RATIO_EPSILON);
        assert!((store.ratios().editor_ratio - 0.25).abs() < 1e-9);

        store.set_output_ratio(0.4).unwrap();
        assert!((store.ratios().sum() - 1.0).abs() <= RATIO_EPSILON);
        assert!((store.ratios().output_ratio - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_single_setter_rejects_out_of_range() {
        let mut store = PaneRatioStore::load(Box::new(MemoryStorage::new()));

        assert!(store.set_details_ratio(0.0).is_err());
        assert!(store.set_editor_ratio(1.0).is_err());
        assert!(store.set_output_ratio(-0.5).is_err());
        assert_eq!(store.ratios(), PaneRatios::EVEN);
    }

    #[test]
    fn test_reset_clears_persisted_value() {
        let shared = SharedStorage::default();

        let mut store = PaneRatioStore::load(Box::new(shared.clone()));
        store.set_ratios(0.6, 0.2, 0.2).unwrap();
        store.reset();
        assert_eq!(store.ratios(), PaneRatios::EVEN);
        assert_eq!(shared.get(PANE_RATIOS_KEY), None);

        let reloaded = PaneRatioStore::load(Box::new(shared));
        assert_eq!(reloaded.ratios(), PaneRatios::EVEN);
    }

    #[test]
    fn test_storage_failure_does_not_block_update() {
        let mut store = PaneRatioStore::load(Box::new(FailingStorage));
        store.set_ratios(0.5, 0.25, 0.25).unwrap();
        store.reset();
        assert_eq!(store.ratios(), PaneRatios::EVEN);
    }
}

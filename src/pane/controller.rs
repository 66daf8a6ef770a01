use crate::pane::layout::Rect;
use crate::pane::ratios::{PaneRatios, PaneWidths, effective_minimum};
use crate::pane::store::PaneRatioStore;

/// 観測された挙動でのペイン最小幅（ピクセル）
pub const MIN_PANE_WIDTH: f64 = 400.0;

/// ドラッグ可能な境界
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Divider {
    /// 詳細ペインとエディタペインの間
    First,
    /// エディタペインと出力ペインの間
    Second,
}

impl Divider {
    /// 1始まりの番号
    pub fn index(self) -> usize {
        match self {
            Divider::First => 1,
            Divider::Second => 2,
        }
    }
}

/// ドラッグ中にポインタを捕捉する資源
///
/// `acquire` と `release` は必ず対になって呼ばれる。
pub trait PointerCapture {
    fn acquire(&mut self, divider: Divider);
    fn release(&mut self);
}

/// 1回のドラッグ操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    pub divider: Divider,
}

/// ポインタのドラッグをペイン比率の更新に変換する
pub struct LayoutController {
    store: PaneRatioStore,
    capture: Box<dyn PointerCapture>,
    session: Option<DragSession>,
    container: Option<Rect>,
    min_pane_width: f64,
}

impl LayoutController {
    pub fn new(store: PaneRatioStore, capture: Box<dyn PointerCapture>, min_pane_width: f64) -> Self {
        Self {
            store,
            capture,
            session: None,
            container: None,
            min_pane_width,
        }
    }

    pub fn store_mut(&mut self) -> &mut PaneRatioStore {
        &mut self.store
    }

    pub fn ratios(&self) -> PaneRatios {
        self.store.ratios()
    }

    pub fn session(&self) -> Option<DragSession> {
        self.session
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn container(&self) -> Option<Rect> {
        self.container
    }

    /// コンテナの位置とサイズを更新（マウント・リサイズ時）
    pub fn set_container(&mut self, container: Rect) {
        self.container = Some(container);
    }

    /// コンテナ幅 `width` での実効最小幅
    pub fn min_width(&self, width: f64) -> f64 {
        effective_minimum(width, self.min_pane_width)
    }

    /// コンテナ幅、未マウントならビューポート幅で解決したピクセル幅
    pub fn widths(&self, viewport_width: f64) -> PaneWidths {
        let width = self
            .container
            .map(|c| c.width as f64)
            .unwrap_or(viewport_width);
        self.store.ratios().resolve(width, self.min_pane_width)
    }

    /// ドラッグ開始（ポインタを捕捉）
    /// 既にドラッグ中なら何もせず false
    pub fn begin_drag(&mut self, divider: Divider) -> bool {
        if let Some(session) = self.session {
            log::debug!(
                "Ignoring press on divider {} while divider {} is dragged",
                divider.index(),
                session.divider.index()
            );
            return false;
        }

        self.capture.acquire(divider);
        self.session = Some(DragSession { divider });
        log::info!("Started dragging divider {}", divider.index());
        true
    }

    /// ポインタ移動: ドラッグ中なら比率を更新
    /// 戻り値は比率が変わったかどうか
    pub fn pointer_move(&mut self, pointer_x: f64) -> bool {
        let Some(session) = self.session else {
            return false;
        };

        let Some(container) = self.container else {
            log::trace!("Container not mounted yet, ignoring pointer move");
            return false;
        };

        let width = container.width as f64;
        if width <= 0.0 {
            return false;
        }

        let x = pointer_x - container.x as f64;
        let current = self.store.ratios().resolve(width, self.min_pane_width);
        let next = drag_widths(session.divider, x, current, width, self.min_pane_width);
        debug_assert!((next.total() - width).abs() < 1e-6);

        let Some(ratios) = next.to_ratios(width) else {
            return false;
        };

        let before = self.store.ratios();
        match self
            .store
            .set_ratios(ratios.details_ratio, ratios.editor_ratio, ratios.output_ratio)
        {
            Ok(after) if after != before => {
                log::debug!(
                    "Divider {} at x={:.1}: widths {:.1}/{:.1}/{:.1}",
                    session.divider.index(),
                    x,
                    next.details,
                    next.editor,
                    next.output
                );
                true
            }
            Ok(_) => false,
            Err(e) => {
                log::warn!("Rejected drag update: {}", e);
                false
            }
        }
    }

    /// ドラッグ終了（ポインタを解放）
    pub fn end_drag(&mut self) -> bool {
        match self.session.take() {
            Some(session) => {
                self.capture.release();
                log::info!(
                    "Stopped dragging divider {}, ratios {:?}",
                    session.divider.index(),
                    self.store.ratios()
                );
                true
            }
            None => false,
        }
    }

    /// フォーカス喪失などでドラッグを中断
    pub fn cancel_drag(&mut self) {
        if self.end_drag() {
            log::info!("Drag cancelled");
        }
    }
}

impl Drop for LayoutController {
    fn drop(&mut self) {
        if self.session.take().is_some() {
            self.capture.release();
        }
    }
}

/// ドラッグ位置 `x`（コンテナ左端基準）から新しい幅を計算
///
/// 隣接する2つのペインだけが変わり、3つ目はそのまま。
/// `current` が最小幅を満たしていれば結果もすべて最小幅以上になる。
pub fn drag_widths(divider: Divider, x: f64, current: PaneWidths, width: f64, min_width: f64) -> PaneWidths {
    let m = effective_minimum(width, min_width);

    match divider {
        Divider::First => {
            let upper = width - current.output - m;
            let details = x.min(upper).max(m);
            PaneWidths {
                details,
                editor: width - details - current.output,
                output: current.output,
            }
        }
        Divider::Second => {
            let editor = (x - current.details).min(width - current.details - m).max(m);
            PaneWidths {
                details: current.details,
                editor,
                output: width - current.details - editor,
            }
        }
    }
}

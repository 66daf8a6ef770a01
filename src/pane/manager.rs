use crate::config::LayoutConfig;
use crate::pane::controller::{Divider, LayoutController};
use crate::pane::layout::{ProblemLayout, Rect};
use crate::pane::pane::{Pane, PaneKind};

/// ポインタ押下の処理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// 境界のドラッグを開始した
    DragStarted(Divider),
    /// タブを切り替えた
    TabSelected(PaneKind, usize),
    /// ペインにフォーカスした
    Focused(PaneKind),
    /// 何もしなかった
    Ignored,
}

/// ペイン管理マネージャー
///
/// レイアウトコントローラと3つのペインをまとめ、ポインタ入力を
/// 境界・タブ・ペイン本文のどれに向けるかを決める。
pub struct PaneManager {
    controller: LayoutController,
    panes: [Pane; 3],
    focused: PaneKind,
    divider_width: u32,
    divider_hit_slop: f64,
    header_height: u32,
    char_width: f32,
    hovering_divider: bool,
}

impl PaneManager {
    pub fn new(controller: LayoutController, config: &LayoutConfig, char_width: f32) -> Self {
        Self {
            controller,
            panes: PaneKind::ALL.map(Pane::new),
            focused: PaneKind::Editor,
            divider_width: config.divider_width,
            divider_hit_slop: config.divider_hit_slop,
            header_height: config.header_height,
            char_width,
            hovering_divider: false,
        }
    }

    pub fn controller(&self) -> &LayoutController {
        &self.controller
    }

    pub fn pane(&self, kind: PaneKind) -> &Pane {
        &self.panes[kind.index()]
    }

    pub fn focused(&self) -> PaneKind {
        self.focused
    }

    pub fn header_height(&self) -> u32 {
        self.header_height
    }

    /// フォントサイズ変更時にタブ幅の計算を更新
    pub fn set_char_width(&mut self, char_width: f32) {
        self.char_width = char_width;
    }

    /// ウィンドウリサイズ時にコンテナを更新
    pub fn resize(&mut self, container: Rect) {
        self.controller.set_container(container);
        log::debug!(
            "Container resized to {}x{} at ({}, {})",
            container.width,
            container.height,
            container.x,
            container.y
        );
    }

    /// 現在の配置（コンテナ未確定なら None）
    pub fn layout(&self) -> Option<ProblemLayout> {
        let container = self.controller.container()?;
        let widths = self.controller.widths(container.width as f64);
        Some(ProblemLayout::compute(container, widths, self.divider_width))
    }

    /// ドラッグ中の境界
    pub fn dragging(&self) -> Option<Divider> {
        self.controller.session().map(|s| s.divider)
    }

    /// マウス位置が境界の近くにあるかチェック
    pub fn is_near_divider(&self, x: f64, y: f64) -> bool {
        self.layout()
            .and_then(|layout| layout.divider_at(x, y, self.divider_hit_slop))
            .is_some()
    }

    /// ホバー状態を更新し、変化したら新しい状態を返す
    pub fn hover(&mut self, x: f64, y: f64) -> Option<bool> {
        let hovering = self.is_near_divider(x, y);
        if hovering == self.hovering_divider {
            return None;
        }
        self.hovering_divider = hovering;
        Some(hovering)
    }

    /// 左ボタン押下
    pub fn pointer_down(&mut self, x: f64, y: f64) -> PressOutcome {
        let Some(layout) = self.layout() else {
            return PressOutcome::Ignored;
        };

        if self.controller.is_dragging() {
            return PressOutcome::Ignored;
        }

        if let Some(divider) = layout.divider_at(x, y, self.divider_hit_slop) {
            self.controller.begin_drag(divider);
            return PressOutcome::DragStarted(divider);
        }

        let Some(kind) = layout.pane_at(x, y) else {
            return PressOutcome::Ignored;
        };
        self.focused = kind;

        let rect = layout.pane_rect(kind);
        let pane = &mut self.panes[kind.index()];
        if let Some(tab) = pane.tab_at(rect, self.header_height, self.char_width, x, y) {
            pane.select_tab(tab);
            return PressOutcome::TabSelected(kind, tab);
        }

        PressOutcome::Focused(kind)
    }

    /// ポインタ移動（戻り値: 再描画が必要か）
    pub fn pointer_move(&mut self, x: f64) -> bool {
        self.controller.pointer_move(x)
    }

    /// 左ボタン解放（戻り値: ドラッグが終了したか）
    pub fn pointer_up(&mut self) -> bool {
        let ended = self.controller.end_drag();
        if ended {
            // Releasing the capture resets the cursor
            self.hovering_divider = false;
        }
        ended
    }

    /// フォーカス喪失時にドラッグを中断（戻り値: 中断したか）
    pub fn cancel_drag(&mut self) -> bool {
        let dragging = self.controller.is_dragging();
        self.controller.cancel_drag();
        if dragging {
            self.hovering_divider = false;
        }
        dragging
    }

    /// フォーカス中のペインを `step` ピクセル広げる（負なら狭める）
    ///
    /// 他の2つは残りを現在の比で分け合う。ドラッグ中は何もしない。
    pub fn resize_focused(&mut self, step: f64) -> bool {
        let Some(container) = self.controller.container() else {
            return false;
        };
        if self.controller.is_dragging() || container.width == 0 {
            return false;
        }

        let width = container.width as f64;
        let m = self.controller.min_width(width);
        let current = self.controller.widths(width);
        let focused_width = match self.focused {
            PaneKind::Details => current.details,
            PaneKind::Editor => current.editor,
            PaneKind::Output => current.output,
        };
        let value = (focused_width + step).clamp(m, width - 2.0 * m) / width;

        let before = self.controller.ratios();
        let store = self.controller.store_mut();
        let result = match self.focused {
            PaneKind::Details => store.set_details_ratio(value),
            PaneKind::Editor => store.set_editor_ratio(value),
            PaneKind::Output => store.set_output_ratio(value),
        };

        match result {
            Ok(after) => after != before,
            Err(e) => {
                log::warn!("Rejected pane resize: {}", e);
                false
            }
        }
    }

    /// フォーカス中のペインのタブを進める
    pub fn next_tab(&mut self) {
        self.panes[self.focused.index()].next_tab();
    }

    /// フォーカス中のペインのタブを戻す
    pub fn prev_tab(&mut self) {
        self.panes[self.focused.index()].prev_tab();
    }

    /// 均等分割に戻す（ドラッグ中なら中断）
    pub fn reset_layout(&mut self) {
        self.controller.cancel_drag();
        self.controller.store_mut().reset();
        self.hovering_divider = false;
    }
}

use crate::pane::layout::Rect;

/// タブ左右の余白（ピクセル）
pub const TAB_PADDING: u32 = 12;

/// 3つのペインの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneKind {
    /// 問題の説明・解説・解答
    Details,
    /// コードエディタ・提出履歴
    Editor,
    /// テストケース・実行結果
    Output,
}

impl PaneKind {
    pub const ALL: [PaneKind; 3] = [PaneKind::Details, PaneKind::Editor, PaneKind::Output];

    /// 左からの位置
    pub fn index(self) -> usize {
        match self {
            PaneKind::Details => 0,
            PaneKind::Editor => 1,
            PaneKind::Output => 2,
        }
    }

    /// ヘッダーに並ぶタブ
    pub fn tabs(self) -> &'static [&'static str] {
        match self {
            PaneKind::Details => &["Description", "Editorial", "Solutions"],
            PaneKind::Editor => &["Code", "Submissions"],
            PaneKind::Output => &["Testcases", "Output"],
        }
    }
}

/// 個別のペイン（タブ付きヘッダーと本文）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    kind: PaneKind,
    active_tab: usize,
}

impl Pane {
    pub fn new(kind: PaneKind) -> Self {
        Self { kind, active_tab: 0 }
    }

    pub fn tabs(&self) -> &'static [&'static str] {
        self.kind.tabs()
    }

    pub fn active_tab(&self) -> usize {
        self.active_tab
    }

    pub fn active_tab_label(&self) -> &'static str {
        self.tabs()[self.active_tab]
    }

    /// タブを選択（範囲外なら false）
    pub fn select_tab(&mut self, index: usize) -> bool {
        if index >= self.tabs().len() {
            return false;
        }
        if index != self.active_tab {
            log::debug!("{:?} pane: switched to tab {}", self.kind, self.tabs()[index]);
        }
        self.active_tab = index;
        true
    }

    /// 次のタブへ（末尾なら先頭へ）
    pub fn next_tab(&mut self) {
        let next = (self.active_tab + 1) % self.tabs().len();
        self.select_tab(next);
    }

    /// 前のタブへ（先頭なら末尾へ）
    pub fn prev_tab(&mut self) {
        let len = self.tabs().len();
        let prev = (self.active_tab + len - 1) % len;
        self.select_tab(prev);
    }

    /// ヘッダー内の各タブの矩形
    pub fn tab_rects(&self, pane_rect: Rect, header_height: u32, char_width: f32) -> Vec<Rect> {
        let mut x = pane_rect.x;
        let right = pane_rect.x + pane_rect.width;

        self.tabs()
            .iter()
            .map(|label| {
                let text_width = (label.chars().count() as f32 * char_width).ceil() as u32;
                let width = (text_width + 2 * TAB_PADDING).min(right.saturating_sub(x));
                let rect = Rect::new(x, pane_rect.y, width, header_height);
                x += width;
                rect
            })
            .collect()
    }

    /// ヘッダー内の点 (x, y) にあるタブ
    pub fn tab_at(&self, pane_rect: Rect, header_height: u32, char_width: f32, x: f64, y: f64) -> Option<usize> {
        self.tab_rects(pane_rect, header_height, char_width)
            .iter()
            .position(|rect| rect.contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycling_wraps() {
        let mut pane = Pane::new(PaneKind::Details);
        assert_eq!(pane.active_tab_label(), "Description");

        pane.next_tab();
        pane.next_tab();
        assert_eq!(pane.active_tab_label(), "Solutions");
        pane.next_tab();
        assert_eq!(pane.active_tab_label(), "Description");

        pane.prev_tab();
        assert_eq!(pane.active_tab_label(), "Solutions");
    }

    #[test]
    fn test_select_out_of_range() {
        let mut pane = Pane::new(PaneKind::Editor);
        assert!(!pane.select_tab(2));
        assert!(pane.select_tab(1));
        assert_eq!(pane.active_tab_label(), "Submissions");
    }

    #[test]
    fn test_tab_hit_testing() {
        let pane = Pane::new(PaneKind::Output);
        let rect = Rect::new(1000, 40, 600, 800);

        // "Testcases" = 9 chars * 8px + 24px padding = 96px
        let tabs = pane.tab_rects(rect, 32, 8.0);
        assert_eq!(tabs[0], Rect::new(1000, 40, 96, 32));
        assert_eq!(tabs[1], Rect::new(1096, 40, 72, 32));

        assert_eq!(pane.tab_at(rect, 32, 8.0, 1010.0, 50.0), Some(0));
        assert_eq!(pane.tab_at(rect, 32, 8.0, 1100.0, 50.0), Some(1));
        assert_eq!(pane.tab_at(rect, 32, 8.0, 1400.0, 50.0), None);
        assert_eq!(pane.tab_at(rect, 32, 8.0, 1010.0, 100.0), None);
    }

    #[test]
    fn test_tabs_clipped_to_narrow_pane() {
        let pane = Pane::new(PaneKind::Details);
        let rect = Rect::new(0, 0, 150, 400);

        let tabs = pane.tab_rects(rect, 32, 8.0);
        let end = tabs.iter().map(|r| r.x + r.width).max().unwrap();
        assert!(end <= 150);
    }
}

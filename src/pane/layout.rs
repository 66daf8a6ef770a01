use crate::pane::controller::Divider;
use crate::pane::pane::PaneKind;
use crate::pane::ratios::PaneWidths;

/// ペインの矩形領域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// 点 (x, y) が矩形内にあるか
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x as f64
            && x < (self.x + self.width) as f64
            && y >= self.y as f64
            && y < (self.y + self.height) as f64
    }
}

/// 1フレーム分の配置結果
#[derive(Debug, Clone, PartialEq)]
pub struct ProblemLayout {
    pub panes: [(PaneKind, Rect); 3],
    pub dividers: [(Divider, Rect); 2],
}

impl ProblemLayout {
    /// コンテナとペイン幅から各ペインと境界の矩形を計算
    ///
    /// 境界はペイン同士の継ぎ目を中心に `divider_width` の幅で描かれ、
    /// ペインの幅自体は変えない。
    pub fn compute(container: Rect, widths: PaneWidths, divider_width: u32) -> Self {
        let left = container.x as f64;
        let seams = [left + widths.details, left + widths.details + widths.editor];
        let right = (container.x + container.width) as f64;

        let edges = [left, seams[0], seams[1], right];
        let pane_rect = |i: usize| {
            let x = edges[i].round() as u32;
            let end = edges[i + 1].round() as u32;
            Rect::new(x, container.y, end.saturating_sub(x), container.height)
        };

        let half = divider_width / 2;
        let divider_rect = |seam: f64| {
            let x = (seam.round() as u32).saturating_sub(half);
            Rect::new(x, container.y, divider_width, container.height)
        };

        Self {
            panes: [
                (PaneKind::Details, pane_rect(0)),
                (PaneKind::Editor, pane_rect(1)),
                (PaneKind::Output, pane_rect(2)),
            ],
            dividers: [
                (Divider::First, divider_rect(seams[0])),
                (Divider::Second, divider_rect(seams[1])),
            ],
        }
    }

    pub fn pane_rect(&self, kind: PaneKind) -> Rect {
        self.panes[kind.index()].1
    }

    /// 点 (x, y) の近く（左右 `slop` ピクセル以内）にある境界
    pub fn divider_at(&self, x: f64, y: f64, slop: f64) -> Option<Divider> {
        self.dividers
            .iter()
            .filter(|(_, rect)| y >= rect.y as f64 && y < (rect.y + rect.height) as f64)
            .map(|(divider, rect)| {
                let center = rect.x as f64 + rect.width as f64 / 2.0;
                (*divider, (x - center).abs())
            })
            .filter(|(_, distance)| *distance <= slop + 0.5)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(divider, _)| divider)
    }

    /// 点 (x, y) を含むペイン
    pub fn pane_at(&self, x: f64, y: f64) -> Option<PaneKind> {
        self.panes
            .iter()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|(kind, _)| *kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widths(details: f64, editor: f64, output: f64) -> PaneWidths {
        PaneWidths { details, editor, output }
    }

    #[test]
    fn test_panes_tile_container() {
        let container = Rect::new(0, 40, 1800, 860);
        let layout = ProblemLayout::compute(container, widths(500.0, 800.0, 500.0), 6);

        assert_eq!(layout.pane_rect(PaneKind::Details), Rect::new(0, 40, 500, 860));
        assert_eq!(layout.pane_rect(PaneKind::Editor), Rect::new(500, 40, 800, 860));
        assert_eq!(layout.pane_rect(PaneKind::Output), Rect::new(1300, 40, 500, 860));
    }

    #[test]
    fn test_dividers_centered_on_seams() {
        let container = Rect::new(10, 0, 1800, 600);
        let layout = ProblemLayout::compute(container, widths(600.0, 600.0, 600.0), 6);

        assert_eq!(layout.dividers[0], (Divider::First, Rect::new(607, 0, 6, 600)));
        assert_eq!(layout.dividers[1], (Divider::Second, Rect::new(1207, 0, 6, 600)));
    }

    #[test]
    fn test_divider_hit_testing() {
        let container = Rect::new(0, 40, 1800, 860);
        let layout = ProblemLayout::compute(container, widths(600.0, 600.0, 600.0), 6);

        assert_eq!(layout.divider_at(600.0, 100.0, 8.0), Some(Divider::First));
        assert_eq!(layout.divider_at(592.0, 100.0, 8.0), Some(Divider::First));
        assert_eq!(layout.divider_at(1205.0, 100.0, 8.0), Some(Divider::Second));
        assert_eq!(layout.divider_at(900.0, 100.0, 8.0), None);
        // Above the container (navbar)
        assert_eq!(layout.divider_at(600.0, 10.0, 8.0), None);
    }

    #[test]
    fn test_pane_at() {
        let container = Rect::new(0, 40, 1800, 860);
        let layout = ProblemLayout::compute(container, widths(400.0, 1000.0, 400.0), 6);

        assert_eq!(layout.pane_at(10.0, 50.0), Some(PaneKind::Details));
        assert_eq!(layout.pane_at(1000.0, 50.0), Some(PaneKind::Editor));
        assert_eq!(layout.pane_at(1799.0, 899.0), Some(PaneKind::Output));
        assert_eq!(layout.pane_at(1000.0, 20.0), None);
    }
}

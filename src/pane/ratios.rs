use serde::{Deserialize, Serialize};

/// 書き込み後の比率合計に許される誤差
pub const RATIO_EPSILON: f64 = 1e-6;

/// 永続化データの読み込み時に許される誤差
pub const LOAD_EPSILON: f64 = 1e-3;

/// 3つのペインの幅の比率（合計は常に1.0）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaneRatios {
    pub details_ratio: f64,
    pub editor_ratio: f64,
    pub output_ratio: f64,
}

impl PaneRatios {
    /// 均等分割
    pub const EVEN: Self = Self {
        details_ratio: 1.0 / 3.0,
        editor_ratio: 1.0 / 3.0,
        output_ratio: 1.0 / 3.0,
    };

    /// 3つの値を合計1.0に正規化して生成
    /// 非有限値・0以下の値を含む場合は None
    pub fn normalized(details: f64, editor: f64, output: f64) -> Option<Self> {
        let values = [details, editor, output];
        if values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return None;
        }

        let sum: f64 = values.iter().sum();
        Some(Self {
            details_ratio: details / sum,
            editor_ratio: editor / sum,
            output_ratio: output / sum,
        })
    }

    pub fn sum(&self) -> f64 {
        self.details_ratio + self.editor_ratio + self.output_ratio
    }

    /// 各値が (0, 1) にあり、合計が誤差 `epsilon` 以内で1.0か
    pub fn is_valid(&self, epsilon: f64) -> bool {
        let in_range = |v: f64| v.is_finite() && v > 0.0 && v < 1.0;
        in_range(self.details_ratio)
            && in_range(self.editor_ratio)
            && in_range(self.output_ratio)
            && (self.sum() - 1.0).abs() <= epsilon
    }

    /// コンテナ幅に対する最小幅を保証したピクセル幅を計算
    pub fn resolve(&self, container_width: f64, min_width: f64) -> PaneWidths {
        let raw = PaneWidths {
            details: self.details_ratio * container_width,
            editor: self.editor_ratio * container_width,
            output: self.output_ratio * container_width,
        };
        raw.enforce_minimum(container_width, effective_minimum(container_width, min_width))
    }
}

impl Default for PaneRatios {
    fn default() -> Self {
        Self::EVEN
    }
}

/// 3つのペインのピクセル幅
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneWidths {
    pub details: f64,
    pub editor: f64,
    pub output: f64,
}

impl PaneWidths {
    pub fn total(&self) -> f64 {
        self.details + self.editor + self.output
    }

    /// 幅をコンテナ幅で割って比率に変換
    pub fn to_ratios(&self, container_width: f64) -> Option<PaneRatios> {
        if container_width <= 0.0 {
            return None;
        }
        PaneRatios::normalized(
            self.details / container_width,
            self.editor / container_width,
            self.output / container_width,
        )
    }

    /// 最小幅を下回るペインを最小幅まで広げ、不足分を他のペインの
    /// 余裕（最小幅を超える分）に比例して差し引く
    fn enforce_minimum(self, container_width: f64, min_width: f64) -> Self {
        let mut widths = [self.details, self.editor, self.output];

        let deficit: f64 = widths.iter().map(|w| (min_width - w).max(0.0)).sum();
        if deficit > 0.0 {
            let slack: f64 = widths.iter().map(|w| (w - min_width).max(0.0)).sum();
            for w in widths.iter_mut() {
                if *w <= min_width {
                    *w = min_width;
                } else if slack > 0.0 {
                    *w -= deficit * (*w - min_width) / slack;
                }
            }
        }

        // Absorb rounding drift into the widest pane so the total is exact
        let drift = container_width - widths.iter().sum::<f64>();
        if let Some(widest) = widths
            .iter_mut()
            .max_by(|a, b| a.total_cmp(b))
        {
            *widest += drift;
        }

        Self {
            details: widths[0],
            editor: widths[1],
            output: widths[2],
        }
    }
}

/// 3つのペインが必ず収まる最小幅
pub fn effective_minimum(container_width: f64, min_width: f64) -> f64 {
    min_width.min(container_width / 3.0).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_even_split_is_valid() {
        assert!(PaneRatios::default().is_valid(RATIO_EPSILON));
        assert!(approx(PaneRatios::default().sum(), 1.0));
    }

    #[test]
    fn test_normalized_rescales() {
        let ratios = PaneRatios::normalized(1.0, 2.0, 1.0).unwrap();
        assert!(approx(ratios.details_ratio, 0.25));
        assert!(approx(ratios.editor_ratio, 0.5));
        assert!(approx(ratios.output_ratio, 0.25));
    }

    #[test]
    fn test_normalized_rejects_bad_input() {
        assert!(PaneRatios::normalized(0.0, 0.5, 0.5).is_none());
        assert!(PaneRatios::normalized(-0.1, 0.5, 0.6).is_none());
        assert!(PaneRatios::normalized(f64::NAN, 0.5, 0.5).is_none());
        assert!(PaneRatios::normalized(f64::INFINITY, 0.5, 0.5).is_none());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_string(&PaneRatios::normalized(1.0, 2.0, 1.0).unwrap()).unwrap();
        assert_eq!(json, r#"{"detailsRatio":0.25,"editorRatio":0.5,"outputRatio":0.25}"#);
    }

    #[test]
    fn test_resolve_keeps_proportions_when_wide_enough() {
        let ratios = PaneRatios::normalized(1.0, 2.0, 1.0).unwrap();
        let widths = ratios.resolve(2000.0, 400.0);

        assert!(approx(widths.details, 500.0));
        assert!(approx(widths.editor, 1000.0));
        assert!(approx(widths.output, 500.0));
    }

    #[test]
    fn test_resolve_raises_narrow_pane() {
        // 0.1 * 2000 = 200 is below the minimum
        let ratios = PaneRatios::normalized(0.1, 0.6, 0.3).unwrap();
        let widths = ratios.resolve(2000.0, 400.0);

        assert!(approx(widths.details, 400.0));
        assert!(widths.editor >= 400.0);
        assert!(widths.output >= 400.0);
        assert!(approx(widths.total(), 2000.0));
        // Deficit of 200 split by excess: editor had 800, output 200
        assert!(approx(widths.editor, 1200.0 - 160.0));
        assert!(approx(widths.output, 600.0 - 40.0));
    }

    #[test]
    fn test_resolve_in_narrow_container_splits_evenly() {
        let ratios = PaneRatios::normalized(0.5, 0.25, 0.25).unwrap();
        let widths = ratios.resolve(900.0, 400.0);

        assert!(approx(widths.details, 300.0));
        assert!(approx(widths.editor, 300.0));
        assert!(approx(widths.output, 300.0));
    }

    #[test]
    fn test_effective_minimum() {
        assert_eq!(effective_minimum(3000.0, 400.0), 400.0);
        assert_eq!(effective_minimum(900.0, 400.0), 300.0);
        assert_eq!(effective_minimum(0.0, 400.0), 0.0);
    }
}

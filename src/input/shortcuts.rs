use winit::keyboard::{KeyCode, ModifiersState};

/// ショートカットアクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    /// ヘルプ表示の切り替え
    ToggleHelp,
    /// ヘルプを閉じる
    CloseHelp,
    /// ペイン幅を均等分割に戻す
    ResetLayout,
    /// フォーカス中のペインを広げる
    GrowFocusedPane,
    /// フォーカス中のペインを狭める
    ShrinkFocusedPane,
    /// ダーク/ライトテーマ切り替え
    ToggleTheme,
    /// フォーカス中のペインの次のタブ
    NextTab,
    /// フォーカス中のペインの前のタブ
    PrevTab,
    /// フォントサイズを大きくする
    IncreaseFontSize,
    /// フォントサイズを小さくする
    DecreaseFontSize,
}

/// ショートカットハンドラー
pub struct ShortcutHandler;

impl ShortcutHandler {
    pub fn new() -> Self {
        Self
    }

    /// キー入力がショートカットに一致するか判定
    pub fn match_shortcut(
        &self,
        key_code: KeyCode,
        modifiers: ModifiersState,
    ) -> Option<ShortcutAction> {
        let ctrl = modifiers.control_key();
        let shift = modifiers.shift_key();
        let alt = modifiers.alt_key();

        match key_code {
            KeyCode::F1 => return Some(ShortcutAction::ToggleHelp),
            KeyCode::Escape => return Some(ShortcutAction::CloseHelp),
            _ => {}
        }

        if ctrl && alt {
            match key_code {
                KeyCode::ArrowRight => Some(ShortcutAction::GrowFocusedPane),
                KeyCode::ArrowLeft => Some(ShortcutAction::ShrinkFocusedPane),
                _ => None,
            }
        } else if ctrl && shift {
            match key_code {
                KeyCode::KeyR => Some(ShortcutAction::ResetLayout),
                KeyCode::KeyT => Some(ShortcutAction::ToggleTheme),
                KeyCode::Tab => Some(ShortcutAction::PrevTab),
                _ => None,
            }
        } else if ctrl {
            // Ctrl のみ（Shift なし）
            match key_code {
                KeyCode::Tab => Some(ShortcutAction::NextTab),
                KeyCode::Equal | KeyCode::NumpadAdd => Some(ShortcutAction::IncreaseFontSize),
                KeyCode::Minus | KeyCode::NumpadSubtract => Some(ShortcutAction::DecreaseFontSize),
                _ => None,
            }
        } else {
            None
        }
    }
}

impl Default for ShortcutHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl_shift() -> ModifiersState {
        let mut modifiers = ModifiersState::empty();
        modifiers.set(ModifiersState::CONTROL, true);
        modifiers.set(ModifiersState::SHIFT, true);
        modifiers
    }

    #[test]
    fn test_layout_shortcuts() {
        let handler = ShortcutHandler::new();

        assert_eq!(
            handler.match_shortcut(KeyCode::KeyR, ctrl_shift()),
            Some(ShortcutAction::ResetLayout)
        );
        assert_eq!(
            handler.match_shortcut(KeyCode::KeyT, ctrl_shift()),
            Some(ShortcutAction::ToggleTheme)
        );
        assert_eq!(handler.match_shortcut(KeyCode::KeyR, ModifiersState::empty()), None);
    }

    #[test]
    fn test_pane_resize_shortcuts() {
        let handler = ShortcutHandler::new();
        let ctrl_alt = ModifiersState::CONTROL | ModifiersState::ALT;

        assert_eq!(
            handler.match_shortcut(KeyCode::ArrowRight, ctrl_alt),
            Some(ShortcutAction::GrowFocusedPane)
        );
        assert_eq!(
            handler.match_shortcut(KeyCode::ArrowLeft, ctrl_alt),
            Some(ShortcutAction::ShrinkFocusedPane)
        );
        assert_eq!(handler.match_shortcut(KeyCode::ArrowLeft, ModifiersState::CONTROL), None);
    }

    #[test]
    fn test_tab_cycling_shortcuts() {
        let handler = ShortcutHandler::new();

        assert_eq!(
            handler.match_shortcut(KeyCode::Tab, ModifiersState::CONTROL),
            Some(ShortcutAction::NextTab)
        );
        assert_eq!(
            handler.match_shortcut(KeyCode::Tab, ctrl_shift()),
            Some(ShortcutAction::PrevTab)
        );
    }

    #[test]
    fn test_help_keys_ignore_modifiers() {
        let handler = ShortcutHandler::new();

        assert_eq!(
            handler.match_shortcut(KeyCode::F1, ModifiersState::empty()),
            Some(ShortcutAction::ToggleHelp)
        );
        assert_eq!(
            handler.match_shortcut(KeyCode::Escape, ctrl_shift()),
            Some(ShortcutAction::CloseHelp)
        );
    }
}

use crate::bridge::BridgeResult;
use crate::content::position::clamp_menu_position;
use crate::models::{MenuPosition, Viewport};
use wasm_bindgen::JsCast;

pub(crate) const MENU_CONTAINER_ID: &str = "quick-add-calendar-menu";
pub(crate) const LOADING_OVERLAY_ID: &str = "quick-add-loading";
pub(crate) const HIDDEN_CLASS: &str = "hidden";
pub(crate) const ITEM_INDEX_ATTR: &str = "data-quick-add-index";

const EMPTY_MENU_TEXT: &str = "メニューを追加してください";

/// Current visible area of `win`, in page coordinates.
pub(crate) fn current_viewport(win: &web_sys::Window) -> Viewport {
    let num = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Viewport {
        scroll_x: win.scroll_x().unwrap_or(0.0),
        scroll_y: win.scroll_y().unwrap_or(0.0),
        width: num(win.inner_width()),
        height: num(win.inner_height()),
    }
}

/// The page's single floating preset menu.
///
/// Created once and reused; the button list is rebuilt on every render. Buttons
/// carry their index in `data-quick-add-index` so one delegated click listener on
/// the container serves all of them.
pub(crate) struct FloatingMenu {
    document: web_sys::Document,
    element: web_sys::HtmlElement,
}

impl FloatingMenu {
    pub fn mount(document: &web_sys::Document) -> BridgeResult<Self> {
        let element: web_sys::HtmlElement = match document.get_element_by_id(MENU_CONTAINER_ID) {
            Some(existing) => existing.unchecked_into(),
            None => {
                let el: web_sys::HtmlElement = document.create_element("div")?.unchecked_into();
                el.set_id(MENU_CONTAINER_ID);
                el.set_class_name("quick-add-menu hidden");
                el.set_attribute("role", "menu")?;
                if let Some(body) = document.body() {
                    body.append_child(&el)?;
                }
                el
            }
        };
        Ok(Self {
            document: document.clone(),
            element,
        })
    }

    pub fn element(&self) -> &web_sys::HtmlElement {
        &self.element
    }

    pub fn contains(&self, node: Option<&web_sys::Node>) -> bool {
        self.element.contains(node)
    }

    pub fn is_visible(&self) -> bool {
        !self.element.class_list().contains(HIDDEN_CLASS)
    }

    pub fn render(&self, items: &[String]) -> BridgeResult<()> {
        self.element.set_inner_html("");

        if items.is_empty() {
            let empty = self.document.create_element("div")?;
            empty.set_class_name("quick-add-menu__empty");
            empty.set_text_content(Some(EMPTY_MENU_TEXT));
            self.element.append_child(&empty)?;
            return Ok(());
        }

        let list = self.document.create_element("ul")?;
        list.set_class_name("quick-add-menu__list");
        for (i, label) in items.iter().enumerate() {
            let item = self.document.create_element("li")?;
            item.set_class_name("quick-add-menu__item");

            let button = self.document.create_element("button")?;
            button.set_attribute("type", "button")?;
            button.set_attribute("role", "menuitem")?;
            button.set_attribute(ITEM_INDEX_ATTR, &i.to_string())?;
            button.set_class_name("quick-add-menu__button");
            button.set_text_content(Some(label));

            item.append_child(&button)?;
            list.append_child(&item)?;
        }
        self.element.append_child(&list)?;
        Ok(())
    }

    /// Show at the page point `(x, y)`, then pull back inside the viewport.
    pub fn show_at(&self, x: f64, y: f64, viewport: Viewport, padding: f64) -> BridgeResult<MenuPosition> {
        self.element.class_list().remove_1(HIDDEN_CLASS)?;
        self.place(MenuPosition { left: x, top: y })?;

        // Measure after it is laid out at the anchor.
        let rect = self.element.get_bounding_client_rect();
        let pos = clamp_menu_position(x, y, rect.width(), rect.height(), viewport, padding);
        self.place(pos)?;
        Ok(pos)
    }

    fn place(&self, pos: MenuPosition) -> BridgeResult<()> {
        let style = self.element.style();
        style.set_property("left", &format!("{}px", pos.left))?;
        style.set_property("top", &format!("{}px", pos.top))?;
        Ok(())
    }

    pub fn hide(&self) {
        let _ = self.element.class_list().add_1(HIDDEN_CLASS);
    }
}

/// Index stored on the menu button that contains `target`, if any.
pub(crate) fn item_index_for(target: &web_sys::Element) -> Option<usize> {
    let button = target
        .closest(&format!("[{ITEM_INDEX_ATTR}]"))
        .ok()
        .flatten()?;
    button.get_attribute(ITEM_INDEX_ATTR)?.parse().ok()
}

/// Full-page spinner shown while the title field is being located.
pub(crate) struct LoadingOverlay {
    document: web_sys::Document,
    element: Option<web_sys::Element>,
}

impl LoadingOverlay {
    pub fn new(document: &web_sys::Document) -> Self {
        Self {
            document: document.clone(),
            element: None,
        }
    }

    fn ensure(&mut self) -> BridgeResult<web_sys::Element> {
        if let Some(el) = &self.element {
            return Ok(el.clone());
        }
        let overlay = self.document.create_element("div")?;
        overlay.set_id(LOADING_OVERLAY_ID);
        overlay.set_class_name("quick-add-loading hidden");
        overlay.set_attribute("aria-hidden", "true")?;

        let spinner = self.document.create_element("div")?;
        spinner.set_class_name("quick-add-loading__spinner");
        overlay.append_child(&spinner)?;

        if let Some(body) = self.document.body() {
            body.append_child(&overlay)?;
        }
        self.element = Some(overlay.clone());
        Ok(overlay)
    }

    pub fn is_visible(&self) -> bool {
        self.element
            .as_ref()
            .map(|el| !el.class_list().contains(HIDDEN_CLASS))
            .unwrap_or(false)
    }

    pub fn show(&mut self) -> BridgeResult<()> {
        let el = self.ensure()?;
        el.class_list().remove_1(HIDDEN_CLASS)?;
        Ok(())
    }

    pub fn hide(&self) {
        if let Some(el) = &self.element {
            let _ = el.class_list().add_1(HIDDEN_CLASS);
        }
    }
}

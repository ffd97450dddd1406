use web_sys::Document;

use super::*;

const ROOT_STYLE: &[(&str, &str)] = &[
    ("min-height", "100vh"),
    ("display", "flex"),
    ("flex-direction", "column"),
    ("font-family", "system-ui, -apple-system, Segoe UI, sans-serif"),
    ("color", "#111827"),
    ("background", "#f8fafc"),
];
const HEADER_STYLE: &[(&str, &str)] = &[
    ("display", "flex"),
    ("justify-content", "space-between"),
    ("align-items", "center"),
    ("padding", "16px 32px"),
    ("border-bottom", "1px solid #e5e7eb"),
];
const HEADER_CONTROLS_STYLE: &[(&str, &str)] = &[("display", "flex"), ("gap", "20px")];
const HEADER_CONTROL_STYLE: &[(&str, &str)] = &[
    ("margin", "0"),
    ("cursor", "pointer"),
    ("font-weight", "500"),
];
const MAIN_STYLE: &[(&str, &str)] = &[
    ("flex", "1"),
    ("display", "flex"),
    ("flex-direction", "column"),
    ("align-items", "center"),
    ("justify-content", "center"),
    ("gap", "20px"),
    ("padding", "32px"),
];
const MODEL_BUTTONS_STYLE: &[(&str, &str)] = &[
    ("display", "flex"),
    ("flex-wrap", "wrap"),
    ("gap", "8px"),
    ("justify-content", "center"),
];
const MODEL_BUTTON_STYLE: &[(&str, &str)] = &[
    ("padding", "8px 16px"),
    ("border-radius", "999px"),
    ("border", "1px solid #d1d5db"),
    ("cursor", "pointer"),
    ("font-size", "14px"),
];
const INPUT_CONTAINER_STYLE: &[(&str, &str)] = &[
    ("display", "flex"),
    ("width", "min(640px, 100%)"),
    ("border", "1px solid #d1d5db"),
    ("border-radius", "12px"),
    ("background", "#ffffff"),
    ("overflow", "hidden"),
];
const INPUT_STYLE: &[(&str, &str)] = &[
    ("flex", "1"),
    ("border", "none"),
    ("outline", "none"),
    ("padding", "14px 16px"),
    ("font-size", "16px"),
];
const SUBMIT_STYLE: &[(&str, &str)] = &[
    ("border", "none"),
    ("background", "transparent"),
    ("padding", "0 16px"),
    ("cursor", "pointer"),
];
const OVERLAY_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("inset", "0"),
    ("align-items", "center"),
    ("justify-content", "center"),
    ("background", "rgba(15, 23, 42, 0.45)"),
    ("z-index", "40"),
];
const MODAL_WINDOW_STYLE: &[(&str, &str)] = &[
    ("position", "relative"),
    ("display", "flex"),
    ("flex-direction", "column"),
    ("gap", "12px"),
    ("min-width", "320px"),
    ("max-height", "70vh"),
    ("padding", "28px"),
    ("border-radius", "16px"),
    ("background", "#ffffff"),
    ("box-shadow", "0 20px 45px rgba(15, 23, 42, 0.25)"),
];
const MODAL_CLOSE_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "10px"),
    ("right", "16px"),
    ("font-size", "22px"),
    ("cursor", "pointer"),
];
const MODAL_INPUT_STYLE: &[(&str, &str)] = &[
    ("padding", "10px 12px"),
    ("border", "1px solid #d1d5db"),
    ("border-radius", "8px"),
    ("font-size", "15px"),
];
const MODAL_BUTTON_STYLE: &[(&str, &str)] = &[
    ("padding", "10px 12px"),
    ("border", "none"),
    ("border-radius", "8px"),
    ("color", "#ffffff"),
    ("font-size", "15px"),
    ("cursor", "pointer"),
];
const HISTORY_LIST_STYLE: &[(&str, &str)] = &[
    ("display", "flex"),
    ("flex-direction", "column"),
    ("gap", "6px"),
    ("overflow-y", "auto"),
];
const HISTORY_ROW_STYLE: &[(&str, &str)] = &[
    ("padding", "8px 10px"),
    ("border-radius", "8px"),
    ("background", "#f1f5f9"),
    ("cursor", "pointer"),
];
const TOAST_STACK_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("top", "16px"),
    ("right", "16px"),
    ("display", "flex"),
    ("flex-direction", "column"),
    ("gap", "8px"),
    ("z-index", "60"),
];
const TOAST_STYLE: &[(&str, &str)] = &[
    ("padding", "10px 14px"),
    ("border-radius", "8px"),
    ("color", "#ffffff"),
    ("max-width", "360px"),
    ("box-shadow", "0 8px 20px rgba(15, 23, 42, 0.2)"),
];

fn document() -> Result<Document, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())
}

fn html_element(document: &Document, tag: &str, id: Option<&str>) -> Result<HtmlElement, String> {
    let element = document
        .create_element(tag)
        .map_err(|_| format!("failed to create <{tag}>"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| format!("<{tag}> is not HtmlElement"))?;
    if let Some(id) = id {
        element.set_id(id);
    }
    Ok(element)
}

fn apply_styles(element: &HtmlElement, styles: &[(&str, &str)]) -> Result<(), String> {
    let style = element.style();
    for (property, value) in styles {
        style
            .set_property(property, value)
            .map_err(|_| format!("failed to set {property}"))?;
    }
    Ok(())
}

fn append(parent: &HtmlElement, child: &HtmlElement) -> Result<(), String> {
    parent
        .append_child(child)
        .map(|_| ())
        .map_err(|_| "failed to append element".to_string())
}

fn element_by_id(document: &Document, id: &str) -> Result<HtmlElement, String> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| format!("missing #{id}"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| format!("#{id} is not HtmlElement"))
}

fn on_click(
    element: &HtmlElement,
    slot: &mut Vec<Closure<dyn FnMut(web_sys::Event)>>,
    command: impl Fn() -> UiCommand + 'static,
) {
    let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
        dispatch(command());
    }));
    let _ = element.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
    slot.push(callback);
}

pub(super) fn read_input_value(id: &str) -> Option<String> {
    let document = document().ok()?;
    let input = document.get_element_by_id(id)?;
    let input = input.dyn_into::<HtmlInputElement>().ok()?;
    Some(input.value())
}

/// Builds the static page skeleton once. Dynamic regions are filled by
/// [`render_view`].
pub(super) fn ensure_page_dom() -> Result<(), String> {
    let document = document()?;
    if document.get_element_by_id(APP_ROOT_ID).is_some() {
        return Ok(());
    }
    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;

    let root = html_element(&document, "div", Some(APP_ROOT_ID))?;
    apply_styles(&root, ROOT_STYLE)?;

    let header = html_element(&document, "header", None)?;
    apply_styles(&header, HEADER_STYLE)?;
    let brand = html_element(&document, "h1", None)?;
    brand.set_inner_text("Rate me!");
    apply_styles(&brand, &[("margin", "0"), ("font-size", "22px"), ("color", ACCENT_COLOR)])?;
    append(&header, &brand)?;
    let controls = html_element(&document, "div", Some(HEADER_CONTROLS_ID))?;
    apply_styles(&controls, HEADER_CONTROLS_STYLE)?;
    append(&header, &controls)?;
    append(&root, &header)?;

    let main = html_element(&document, "main", None)?;
    apply_styles(&main, MAIN_STYLE)?;

    let models = html_element(&document, "div", Some(MODEL_BUTTONS_ID))?;
    apply_styles(&models, MODEL_BUTTONS_STYLE)?;
    append(&main, &models)?;

    let model_info = html_element(&document, "p", None)?;
    apply_styles(&model_info, &[("margin", "0"), ("color", "#4b5563")])?;
    model_info.set_inner_text("Модель: ");
    let model_name = html_element(&document, "strong", Some(MODEL_INFO_ID))?;
    append(&model_info, &model_name)?;
    append(&main, &model_info)?;

    let input_container = html_element(&document, "div", None)?;
    apply_styles(&input_container, INPUT_CONTAINER_STYLE)?;
    let input = document
        .create_element("input")
        .map_err(|_| "failed to create product input".to_string())?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| "product input is not HtmlInputElement".to_string())?;
    input.set_id(PRODUCT_INPUT_ID);
    input.set_type("text");
    input.set_placeholder("Вставьте ссылку на mustapp.com");
    apply_styles(&input, INPUT_STYLE)?;
    append(&input_container, &input)?;

    let submit = html_element(&document, "button", Some(SUBMIT_BUTTON_ID))?;
    apply_styles(&submit, SUBMIT_STYLE)?;
    let icon = document
        .create_element("img")
        .map_err(|_| "failed to create submit icon".to_string())?
        .dyn_into::<HtmlImageElement>()
        .map_err(|_| "submit icon is not HtmlImageElement".to_string())?;
    icon.set_id(SUBMIT_ICON_ID);
    icon.set_alt("");
    icon.set_width(24);
    icon.set_height(24);
    append(&submit, &icon)?;
    append(&input_container, &submit)?;
    append(&main, &input_container)?;
    append(&root, &main)?;

    let loading = html_element(&document, "div", Some(LOADING_OVERLAY_ID))?;
    apply_styles(&loading, OVERLAY_STYLE)?;
    apply_styles(&loading, &[("display", "none"), ("color", "#ffffff"), ("z-index", "50")])?;
    loading.set_inner_text("Загрузка…");
    append(&root, &loading)?;

    let modal = html_element(&document, "div", Some(MODAL_ROOT_ID))?;
    apply_styles(&modal, OVERLAY_STYLE)?;
    apply_styles(&modal, &[("display", "none")])?;
    append(&root, &modal)?;

    let toasts = html_element(&document, "div", Some(TOAST_STACK_ID))?;
    apply_styles(&toasts, TOAST_STACK_STYLE)?;
    append(&root, &toasts)?;

    body.append_child(&root)
        .map_err(|_| "failed to append page root".to_string())?;
    Ok(())
}

pub(super) fn attach_static_handlers() -> Result<(), String> {
    let document = document()?;
    let input = element_by_id(&document, PRODUCT_INPUT_ID)?;
    let submit = element_by_id(&document, SUBMIT_BUTTON_ID)?;

    STATIC_HANDLERS.with(|slot| {
        let mut handlers = slot.borrow_mut();
        if !handlers.is_empty() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
            let value = read_input_value(PRODUCT_INPUT_ID).unwrap_or_default();
            dispatch(UiCommand::InputChanged { value });
        }));
        let _ = input.add_event_listener_with_callback("input", callback.as_ref().unchecked_ref());
        handlers.push(callback);

        on_click(&submit, &mut handlers, || UiCommand::Submit);
    });

    INPUT_KEYDOWN_HANDLER.with(|slot| {
        if slot.borrow().is_some() {
            return;
        }
        let callback = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::wrap(Box::new(
            move |event: web_sys::KeyboardEvent| {
                if event.key() == "Enter" {
                    event.prevent_default();
                    dispatch(UiCommand::Submit);
                }
            },
        ));
        if let Ok(input) = element_by_id(&document, PRODUCT_INPUT_ID) {
            let _ = input
                .add_event_listener_with_callback("keydown", callback.as_ref().unchecked_ref());
        }
        *slot.borrow_mut() = Some(callback);
    });
    Ok(())
}

pub(super) fn render_view(state: &ViewState) -> Result<(), String> {
    let document = document()?;
    render_header(&document, state)?;
    render_models(&document, state)?;
    render_input_affordance(&document, state)?;
    render_loading(&document, state)?;
    render_modal(&document, state)
}

fn header_command(control: HeaderControl) -> UiCommand {
    match control {
        HeaderControl::Register => UiCommand::OpenRegister,
        HeaderControl::Login => UiCommand::OpenLogin,
        HeaderControl::History => UiCommand::OpenHistory,
        HeaderControl::UploadModel => UiCommand::OpenUploadPage,
        HeaderControl::Logout => UiCommand::Logout,
    }
}

fn render_header(document: &Document, state: &ViewState) -> Result<(), String> {
    let controls = state.header_controls();
    let unchanged = RENDERED_HEADER.with(|rendered| rendered.borrow().as_ref() == Some(&controls));
    if unchanged {
        return Ok(());
    }

    let container = element_by_id(document, HEADER_CONTROLS_ID)?;
    container.set_inner_html("");
    HEADER_HANDLERS.with(|slot| -> Result<(), String> {
        let mut handlers = slot.borrow_mut();
        handlers.clear();
        for control in &controls {
            let item = html_element(document, "p", None)?;
            item.set_inner_text(control.label());
            apply_styles(&item, HEADER_CONTROL_STYLE)?;
            let control = *control;
            on_click(&item, &mut handlers, move || header_command(control));
            append(&container, &item)?;
        }
        Ok(())
    })?;

    RENDERED_HEADER.with(|rendered| {
        *rendered.borrow_mut() = Some(controls);
    });
    Ok(())
}

fn render_models(document: &Document, state: &ViewState) -> Result<(), String> {
    let container = element_by_id(document, MODEL_BUTTONS_ID)?;
    let unchanged =
        RENDERED_MODELS.with(|rendered| rendered.borrow().as_deref() == Some(&state.models[..]));

    if !unchanged {
        container.set_inner_html("");
        MODEL_HANDLERS.with(|slot| -> Result<(), String> {
            let mut handlers = slot.borrow_mut();
            handlers.clear();
            for option in &state.models {
                let button = html_element(document, "button", None)?;
                button.set_inner_text(&option.label);
                let _ = button.set_attribute("data-model", option.key.as_str());
                apply_styles(&button, MODEL_BUTTON_STYLE)?;
                let key = option.key.clone();
                on_click(&button, &mut handlers, move || UiCommand::SelectModel {
                    key: key.clone(),
                });
                append(&container, &button)?;
            }
            Ok(())
        })?;
        RENDERED_MODELS.with(|rendered| {
            *rendered.borrow_mut() = Some(state.models.clone());
        });
    }

    let buttons = container.children();
    for (index, option) in state.models.iter().enumerate() {
        let Some(button) = u32::try_from(index)
            .ok()
            .and_then(|index| buttons.item(index))
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        let active = state.is_selected(&option.key);
        let _ = button.class_list().toggle_with_force("active", active);
        let (background, color) = if active {
            (ACCENT_COLOR, "#ffffff")
        } else {
            ("#ffffff", "#111827")
        };
        apply_styles(&button, &[("background", background), ("color", color)])?;
    }

    let model_name = element_by_id(document, MODEL_INFO_ID)?;
    let label = state
        .selected_option()
        .map_or("—", |option| option.label.as_str());
    model_name.set_inner_text(label);
    Ok(())
}

fn render_input_affordance(document: &Document, state: &ViewState) -> Result<(), String> {
    let icon = document
        .get_element_by_id(SUBMIT_ICON_ID)
        .ok_or_else(|| format!("missing #{SUBMIT_ICON_ID}"))?
        .dyn_into::<HtmlImageElement>()
        .map_err(|_| "submit icon is not HtmlImageElement".to_string())?;
    let source = state.input_affordance().icon();
    if icon.get_attribute("src").as_deref() != Some(source) {
        icon.set_src(source);
    }
    Ok(())
}

fn render_loading(document: &Document, state: &ViewState) -> Result<(), String> {
    let overlay = element_by_id(document, LOADING_OVERLAY_ID)?;
    let display = if state.is_loading() { "flex" } else { "none" };
    apply_styles(&overlay, &[("display", display)])
}

fn render_modal(document: &Document, state: &ViewState) -> Result<(), String> {
    let unchanged = RENDERED_MODAL.with(|rendered| *rendered.borrow() == state.modal);
    if unchanged {
        return Ok(());
    }

    let root = element_by_id(document, MODAL_ROOT_ID)?;
    root.set_inner_html("");
    MODAL_HANDLERS.with(|slot| slot.borrow_mut().clear());

    match &state.modal {
        Some(modal) => {
            build_modal(document, &root, modal)?;
            apply_styles(&root, &[("display", "flex")])?;
        }
        None => apply_styles(&root, &[("display", "none")])?,
    }

    RENDERED_MODAL.with(|rendered| {
        *rendered.borrow_mut() = state.modal.clone();
    });
    Ok(())
}

fn build_modal(document: &Document, root: &HtmlElement, modal: &Modal) -> Result<(), String> {
    let window = html_element(document, "div", None)?;
    apply_styles(&window, MODAL_WINDOW_STYLE)?;

    let close = html_element(document, "span", None)?;
    close.set_inner_text("×");
    apply_styles(&close, MODAL_CLOSE_STYLE)?;
    append(&window, &close)?;

    let title = html_element(document, "h2", None)?;
    title.set_inner_text(modal.title);
    apply_styles(&title, &[("margin", "0 0 8px 0")])?;
    append(&window, &title)?;

    MODAL_HANDLERS.with(|slot| -> Result<(), String> {
        let mut handlers = slot.borrow_mut();
        on_click(&close, &mut handlers, || UiCommand::CloseModal);

        match &modal.body {
            ModalBody::Form {
                fields,
                submit_label,
            } => {
                for field in fields {
                    let input = document
                        .create_element("input")
                        .map_err(|_| "failed to create modal input".to_string())?
                        .dyn_into::<HtmlInputElement>()
                        .map_err(|_| "modal input is not HtmlInputElement".to_string())?;
                    input.set_id(&format!("{MODAL_FIELD_ID_PREFIX}{}", field.name));
                    input.set_type(if field.secret { "password" } else { "text" });
                    input.set_placeholder(field.placeholder);
                    apply_styles(&input, MODAL_INPUT_STYLE)?;
                    append(&window, &input)?;
                }

                let submit = html_element(document, "button", Some(MODAL_SUBMIT_ID))?;
                submit.set_inner_text(submit_label);
                apply_styles(&submit, MODAL_BUTTON_STYLE)?;
                apply_styles(&submit, &[("background", ACCENT_COLOR)])?;
                let names: Vec<&'static str> = fields.iter().map(|field| field.name).collect();
                on_click(&submit, &mut handlers, move || {
                    let mut values = FormValues::new();
                    for name in &names {
                        let id = format!("{MODAL_FIELD_ID_PREFIX}{name}");
                        values.insert(name, read_input_value(&id).unwrap_or_default());
                    }
                    UiCommand::SubmitModal { values }
                });
                append(&window, &submit)?;
            }
            ModalBody::History { rows } => {
                let list = html_element(document, "div", None)?;
                apply_styles(&list, HISTORY_LIST_STYLE)?;
                if rows.is_empty() {
                    let empty = html_element(document, "p", None)?;
                    empty.set_inner_text(rateme_app_state::messages::HISTORY_EMPTY);
                    append(&list, &empty)?;
                }
                for row in rows {
                    let item = html_element(document, "div", None)?;
                    item.set_inner_text(&row.label);
                    let _ = item.set_attribute("data-id", &row.id.to_string());
                    apply_styles(&item, HISTORY_ROW_STYLE)?;
                    let id = row.id.clone();
                    on_click(&item, &mut handlers, move || UiCommand::OpenHistoryEntry {
                        id: id.clone(),
                    });
                    append(&list, &item)?;
                }
                append(&window, &list)?;
            }
        }
        Ok(())
    })?;

    append(root, &window)
}

/// Appends a toast and hands it back so the caller can retire it.
pub(super) fn show_toast(notice: &Notice) -> Result<HtmlElement, String> {
    let document = document()?;
    let stack = element_by_id(&document, TOAST_STACK_ID)?;
    let toast = html_element(&document, "div", None)?;
    toast.set_inner_text(&notice.message);
    apply_styles(&toast, TOAST_STYLE)?;
    let background = match notice.level {
        NoticeLevel::Success => SUCCESS_COLOR,
        NoticeLevel::Error => ERROR_COLOR,
    };
    apply_styles(&toast, &[("background", background)])?;
    append(&stack, &toast)?;
    Ok(toast)
}
